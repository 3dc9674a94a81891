// TapWatch - Wi-Fi Scanner
//
// The radio stays off except while a scan is running.

use esp_idf_hal::modem::Modem;
use esp_idf_svc::eventloop::EspSystemEventLoop;
use esp_idf_svc::nvs::EspDefaultNvsPartition;
use esp_idf_svc::wifi::{BlockingWifi, ClientConfiguration, Configuration, EspWifi};
use tapwatch::events::AccessPoint;
use tapwatch::platform::WifiScanner;

pub struct Scanner {
    wifi: BlockingWifi<EspWifi<'static>>,
}

impl Scanner {
    pub fn new(
        modem: Modem,
        sysloop: EspSystemEventLoop,
        nvs: EspDefaultNvsPartition,
    ) -> anyhow::Result<Self> {
        let esp_wifi = EspWifi::new(modem, sysloop.clone(), Some(nvs))?;
        let mut wifi = BlockingWifi::wrap(esp_wifi, sysloop)?;
        wifi.set_configuration(&Configuration::Client(ClientConfiguration::default()))?;
        Ok(Self { wifi })
    }
}

impl WifiScanner for Scanner {
    fn scan(&mut self) -> anyhow::Result<Vec<AccessPoint>> {
        self.wifi.start()?;
        let found = self.wifi.scan();
        self.wifi.stop()?;

        Ok(found?
            .into_iter()
            .map(|ap| AccessPoint {
                ssid: ap.ssid.as_str().to_owned(),
                rssi: ap.signal_strength,
            })
            .collect())
    }
}
