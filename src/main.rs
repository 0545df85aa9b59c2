use coreclr_host::{logging, start_session, stop_session, HostResult};

const APP_DOMAIN_NAME: &str = "powershell";

fn main() {
    logging::init();

    if let Err(e) = run() {
        eprintln!("coreclr-host: {}", e);
        std::process::exit(1);
    }
}

fn run() -> HostResult<()> {
    let session = start_session(APP_DOMAIN_NAME)?;
    stop_session(session)
}
