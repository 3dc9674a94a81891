// TapWatch - Battery ADC
//
// One-shot ADC1 reads via raw ESP-IDF calls. GPIO35 is ADC1 channel 7,
// behind a 1:2 divider; 11 dB attenuation at 9-bit width.

use anyhow::bail;
use tapwatch::platform::BatterySense;

pub struct AdcBattery {
    handle: esp_idf_sys::adc_oneshot_unit_handle_t,
    channel: esp_idf_sys::adc_channel_t,
}

impl AdcBattery {
    pub fn new() -> anyhow::Result<Self> {
        let channel = esp_idf_sys::adc_channel_t_ADC_CHANNEL_7; // GPIO35

        unsafe {
            let mut handle: esp_idf_sys::adc_oneshot_unit_handle_t = core::ptr::null_mut();
            let unit_cfg = esp_idf_sys::adc_oneshot_unit_init_cfg_t {
                unit_id: esp_idf_sys::adc_unit_t_ADC_UNIT_1,
                ulp_mode: esp_idf_sys::adc_ulp_mode_t_ADC_ULP_MODE_DISABLE,
                ..core::mem::zeroed()
            };
            let ret = esp_idf_sys::adc_oneshot_new_unit(&unit_cfg, &mut handle);
            if ret != esp_idf_sys::ESP_OK {
                bail!("ADC unit init failed ({})", ret);
            }

            let chan_cfg = esp_idf_sys::adc_oneshot_chan_cfg_t {
                atten: esp_idf_sys::adc_atten_t_ADC_ATTEN_DB_11,
                bitwidth: esp_idf_sys::adc_bitwidth_t_ADC_BITWIDTH_9,
            };
            let ret = esp_idf_sys::adc_oneshot_config_channel(handle, channel, &chan_cfg);
            if ret != esp_idf_sys::ESP_OK {
                bail!("ADC channel config failed ({})", ret);
            }

            Ok(Self { handle, channel })
        }
    }
}

impl BatterySense for AdcBattery {
    fn read_raw(&mut self) -> anyhow::Result<u16> {
        let mut raw: i32 = 0;
        let ret = unsafe { esp_idf_sys::adc_oneshot_read(self.handle, self.channel, &mut raw) };
        if ret != esp_idf_sys::ESP_OK {
            bail!("ADC read failed ({})", ret);
        }
        Ok(raw.clamp(0, i32::from(u16::MAX)) as u16)
    }
}
