//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter    | Implements          | Connects to                |
//! |------------|---------------------|----------------------------|
//! | `wifi`     | NetworkLink         | ESP-IDF WiFi STA           |
//! | `mqtt`     | BrokerPort          | ESP-IDF MQTT client        |
//! | `light`    | ActuatorPort        | GPIO output pin            |
//! | `time`     | TimePort, DelayPort | ESP32 system timer         |
//! | `log_sink` | EventSink           | Serial log output          |
//!
//! Every adapter is dual-target: the real implementation is behind the
//! `espidf` feature, everything else gets a simulation stub so the crate
//! builds and tests on the host without the ESP-IDF toolchain.

pub mod light;
pub mod log_sink;
pub mod mqtt;
pub mod time;
pub mod wifi;
