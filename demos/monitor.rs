use std::env;
use std::time::Duration;

use neviweb::{ClimateEntity, PlatformConfig, setup_platform};

#[tokio::main]
async fn main() -> neviweb::Result<()> {
    tracing_subscriber::fmt::init();

    let args: Vec<String> = env::args().collect();
    let [email, password, gateway] = match args.as_slice() {
        [_, e, p, g] => [e.clone(), p.clone(), g.clone()],
        _ => {
            eprintln!("usage: monitor <email> <password> <gateway-name>");
            std::process::exit(2);
        }
    };

    let config = PlatformConfig::new(email, password, gateway);
    let mut entities = setup_platform(&config).await?;
    println!("Found {} thermostats", entities.len());

    loop {
        for entity in &mut entities {
            match entity.refresh().await {
                Ok(()) => {
                    let current = entity
                        .current_temperature()
                        .map_or("?".to_string(), |t| format!("{t:.1}"));
                    let target = entity
                        .target_temperature()
                        .map_or("?".to_string(), |t| format!("{t:.1}"));
                    println!(
                        "[{}] {current}\u{00b0}C \u{2192} {target}\u{00b0}C | {}",
                        entity.name(),
                        entity.operating_state().as_str(),
                    );
                }
                Err(e) => eprintln!("[{}] refresh error: {e}", entity.name()),
            }
        }
        tokio::time::sleep(Duration::from_secs(60)).await;
    }
}
