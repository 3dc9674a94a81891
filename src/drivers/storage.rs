// TapWatch - Calibration Storage
//
// The calibration record is one NVS string; it survives deep sleep and
// reflashing of the application partition.

use anyhow::Context;
use esp_idf_svc::nvs::{EspDefaultNvsPartition, EspNvs, NvsDefault};
use tapwatch::config::*;
use tapwatch::platform::CalibrationStore;

const RECORD_MAX: usize = 128;

pub struct NvsStore {
    nvs: EspNvs<NvsDefault>,
}

impl NvsStore {
    pub fn new(partition: EspDefaultNvsPartition) -> anyhow::Result<Self> {
        let nvs = EspNvs::new(partition, NVS_NAMESPACE, true)
            .with_context(|| format!("open NVS namespace {NVS_NAMESPACE:?}"))?;
        Ok(Self { nvs })
    }
}

impl CalibrationStore for NvsStore {
    fn load(&mut self) -> anyhow::Result<Option<String>> {
        let mut buf = [0u8; RECORD_MAX];
        let record = self.nvs.get_str(NVS_CALIBRATION_KEY, &mut buf)?;
        Ok(record.map(str::to_owned))
    }

    fn save(&mut self, record: &str) -> anyhow::Result<()> {
        self.nvs
            .set_str(NVS_CALIBRATION_KEY, record)
            .context("write calibration record")?;
        Ok(())
    }
}
