//! WiFi station-mode adapter.
//!
//! Implements [`NetworkLink`]: one association attempt per call; the
//! unbounded 500 ms retry loop lives in the caller via the shared
//! converge primitive. The device has no other job while offline, so the
//! caller blocking indefinitely is the intended contract.
//!
//! ## cfg gating
//!
//! - **`espidf` feature**: real station association via
//!   `esp_idf_svc::wifi::BlockingWifi`.
//! - **host**: simulation stub with scriptable failures for tests.

use log::info;

use crate::app::ports::NetworkLink;
use crate::error::TransportError;

#[cfg(feature = "espidf")]
use anyhow::Context;
#[cfg(feature = "espidf")]
use esp_idf_svc::{
    eventloop::EspSystemEventLoop,
    hal::modem::Modem,
    nvs::EspDefaultNvsPartition,
    wifi::{AuthMethod, BlockingWifi, ClientConfiguration, Configuration, EspWifi},
};

use crate::config::NodeConfig;

/// Station-mode network link.
pub struct WifiLink {
    #[cfg(feature = "espidf")]
    wifi: BlockingWifi<EspWifi<'static>>,
    #[cfg(not(feature = "espidf"))]
    sim: SimState,
}

#[cfg(not(feature = "espidf"))]
struct SimState {
    ssid: heapless::String<32>,
    associated: bool,
    fail_next: u32,
    attempts: u32,
}

#[cfg(feature = "espidf")]
impl WifiLink {
    /// Build and start the station. Association itself happens in
    /// [`NetworkLink::try_associate`].
    pub fn new(
        modem: Modem,
        sysloop: EspSystemEventLoop,
        nvs: EspDefaultNvsPartition,
        config: &NodeConfig,
    ) -> anyhow::Result<Self> {
        let mut wifi = BlockingWifi::wrap(
            EspWifi::new(modem, sysloop.clone(), Some(nvs))?,
            sysloop,
        )?;
        wifi.set_configuration(&Configuration::Client(ClientConfiguration {
            ssid: config
                .wifi_ssid
                .as_str()
                .try_into()
                .ok()
                .context("SSID exceeds 32 bytes")?,
            password: config
                .wifi_passphrase
                .as_str()
                .try_into()
                .ok()
                .context("passphrase exceeds 64 bytes")?,
            auth_method: AuthMethod::WPA2Personal,
            ..Default::default()
        }))?;
        wifi.start()?;
        info!("WiFi: station started (SSID='{}')", config.wifi_ssid);
        Ok(Self { wifi })
    }
}

#[cfg(not(feature = "espidf"))]
impl WifiLink {
    pub fn new(config: &NodeConfig) -> Self {
        Self {
            sim: SimState {
                ssid: config.wifi_ssid.clone(),
                associated: false,
                fail_next: 0,
                attempts: 0,
            },
        }
    }

    /// Script the next `n` association attempts to fail.
    pub fn sim_fail_next(&mut self, n: u32) {
        self.sim.fail_next = n;
    }

    /// Number of association attempts made so far.
    pub fn sim_attempts(&self) -> u32 {
        self.sim.attempts
    }
}

#[cfg(feature = "espidf")]
impl NetworkLink for WifiLink {
    fn try_associate(&mut self) -> Result<(), TransportError> {
        self.wifi
            .connect()
            .map_err(|_| TransportError::AssociationFailed)?;
        self.wifi
            .wait_netif_up()
            .map_err(|_| TransportError::AssociationFailed)?;
        info!("WiFi: associated");
        Ok(())
    }

    fn is_associated(&self) -> bool {
        self.wifi.is_connected().unwrap_or(false)
    }
}

#[cfg(not(feature = "espidf"))]
impl NetworkLink for WifiLink {
    fn try_associate(&mut self) -> Result<(), TransportError> {
        self.sim.attempts += 1;
        if self.sim.fail_next > 0 {
            self.sim.fail_next -= 1;
            return Err(TransportError::AssociationFailed);
        }
        self.sim.associated = true;
        info!(
            "WiFi(sim): associated with '{}' (attempt {})",
            self.sim.ssid, self.sim.attempts
        );
        Ok(())
    }

    fn is_associated(&self) -> bool {
        self.sim.associated
    }
}
