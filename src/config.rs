//! Node configuration parameters
//!
//! All tunable parameters for the RoomNode firmware. There is no runtime
//! configuration source on this device: credentials, broker address and
//! cadences are compile-time defaults baked into [`NodeConfig::default`].

use serde::{Deserialize, Serialize};

/// MQTT topic the node subscribes to for light commands.
pub const TOPIC_LIGHTS: &str = "actuators/lights";
/// MQTT topic for temperature readings.
pub const TOPIC_TEMPERATURE: &str = "sensors/temperature";
/// MQTT topic for humidity readings.
pub const TOPIC_HUMIDITY: &str = "sensors/humidity";

/// Payload that switches the light on. Exact-match, case-sensitive.
pub const PAYLOAD_ON: &[u8] = b"ON";
/// Payload that switches the light off. Exact-match, case-sensitive.
pub const PAYLOAD_OFF: &[u8] = b"OFF";

/// Core node configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeConfig {
    // --- Network ---
    /// WiFi station SSID
    pub wifi_ssid: heapless::String<32>,
    /// WiFi station passphrase
    pub wifi_passphrase: heapless::String<64>,
    /// Per-attempt delay while associating (milliseconds)
    pub link_retry_delay_ms: u32,

    // --- Broker session ---
    /// MQTT broker host
    pub broker_host: heapless::String<64>,
    /// MQTT broker port
    pub broker_port: u16,
    /// MQTT client identifier
    pub client_id: heapless::String<32>,
    /// Delay between failed session-establishment attempts (milliseconds)
    pub session_retry_delay_ms: u32,

    // --- Telemetry ---
    /// Minimum interval between telemetry publishes (milliseconds)
    pub publish_interval_ms: u32,
    /// Delay between cold-start sensor init attempts (milliseconds)
    pub sensor_retry_delay_ms: u32,

    // --- Hardware ---
    /// GPIO driving the light output
    pub light_gpio: i32,
    /// AHT10 I2C address
    pub sensor_i2c_addr: u8,
}

impl Default for NodeConfig {
    fn default() -> Self {
        fn s<const N: usize>(v: &str) -> heapless::String<N> {
            let mut out = heapless::String::new();
            // Literals below all fit their capacities.
            let _ = out.push_str(v);
            out
        }
        Self {
            // Network
            wifi_ssid: s("Schrodinger "),
            wifi_passphrase: s("@WaveEquation"),
            link_retry_delay_ms: 500,

            // Broker session
            broker_host: s("192.168.100.5"),
            broker_port: 1883,
            client_id: s("esp32-device"),
            session_retry_delay_ms: 5000,

            // Telemetry
            publish_interval_ms: 5000,
            sensor_retry_delay_ms: 5000,

            // Hardware
            light_gpio: 4,
            sensor_i2c_addr: 0x38,
        }
    }
}
