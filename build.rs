fn main() {
    // Emit the ESP-IDF link arguments and sdkconfig cfgs propagated by
    // esp-idf-sys. Host builds have nothing to emit; feature cfgs are
    // not visible to build scripts, hence the env var.
    if std::env::var_os("CARGO_FEATURE_ESPIDF").is_some() {
        embuild::espidf::sysenv::output();
    }
}
