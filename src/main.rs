use log::error;

fn main() {
    env_logger::init();

    let app = furshell::FurshellApp::new();
    if let Err(err) = app.run() {
        error!("startup failed: {err}");
        std::process::exit(-1);
    }
}
