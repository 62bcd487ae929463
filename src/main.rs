use weaver_engine::app::App;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    log::info!("Starting weaver");
    App::run()
}
