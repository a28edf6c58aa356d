/// Example program to print the loaded configuration
///
/// Run with: cargo run -p rune-config --example print_config

fn main() {
    // Load configuration from rune.toml
    let config = rune_config::RuneConfig::load();
    let animation = &config.animation;

    println!("=== Rune Animation Configuration ===\n");

    println!("Timing Settings:");
    println!("  Speed (ms): {}", animation.speed_ms);
    println!("  Duration (ms): {}", animation.duration_ms);
    println!("  Loops: {}", animation.loops);
    println!("  Ping Pong: {}", animation.ping_pong);
    println!("  Direction: {:?}", animation.direction);
    println!();

    println!("Curve Settings:");
    println!("  Function: {:?}", animation.curve.function);
    println!("  Weight: {:?}", animation.curve.weight);
    println!("  Amplitude: {}", animation.curve.amplitude);
    println!("  Overshoot: {}", animation.curve.overshoot);
    println!("  Period: {}", animation.curve.period);
    println!("  Clip: {}", animation.curve.clip);
    println!();

    println!("Logging Settings:");
    println!("  Filter: {:?}", config.logging.filter);
    println!();

    if let Err(e) = config.validate() {
        eprintln!("Configuration is invalid: {}", e);
    }

    // Try to serialize to TOML for verification
    match toml::to_string_pretty(&config) {
        Ok(toml_str) => {
            println!("=== Serialized Configuration ===");
            println!("{}", toml_str);
        }
        Err(e) => {
            eprintln!("Failed to serialize config: {}", e);
        }
    }
}
