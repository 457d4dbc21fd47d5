use std::process;

fn main() {
    let config = match akbarc_drv::parse_args(std::env::args().skip(1)) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{e}");
            process::exit(2);
        },
    };
    if let Err(e) = akbarc_drv::run(&config) {
        eprintln!("{e:#}");
        process::exit(1);
    }
}
