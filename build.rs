fn main() {
    // Host builds (unit tests) have no ESP-IDF environment to forward.
    if std::env::var("CARGO_FEATURE_DEVICE").is_ok() {
        embuild::espidf::sysenv::output();
    }
}
