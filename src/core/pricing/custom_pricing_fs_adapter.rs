use std::{
    fs::{self, File},
    io::{BufRead, BufReader, Write},
    path::{Path, PathBuf},
};

use anyhow::{anyhow, Context, Result};

use super::custom_pricing_entity::CustomPricing;

/// FS adapter for the custom pricing file.
///
/// Uses a simple key-value `pricing.rci` file with atomic writes.
pub struct CustomPricingFsAdapter {
    path: PathBuf,
}

impl CustomPricingFsAdapter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn read(&self) -> Result<CustomPricing> {
        if !self.path.exists() {
            return Err(anyhow!("pricing file {} does not exist", self.path.display()));
        }

        let file = File::open(&self.path).context("Failed to open pricing file")?;
        let reader = BufReader::new(file);
        let mut p = CustomPricing::default();

        for line in reader.lines() {
            let line = line?;
            if let Some((key, val)) = line.split_once(':') {
                let key = key.trim().to_uppercase();
                let val = val.trim().to_string();

                match key.as_str() {
                    "CPU" => p.cpu = val,
                    "RAM" => p.ram = val,
                    "GPU" => p.gpu = val,
                    "STORAGE" => p.storage = val,
                    "SPOT_CPU" => p.spot_cpu = val,
                    "SPOT_RAM" => p.spot_ram = val,
                    "SPOT_GPU" => p.spot_gpu = val,
                    "CUSTOM_PRICES_ENABLED" => p.custom_prices_enabled = val.eq_ignore_ascii_case("true"),
                    _ => {}
                }
            }
        }

        Ok(p)
    }

    pub fn write(&self, data: &CustomPricing) -> Result<()> {
        if let Some(dir) = self.path.parent() {
            if !dir.as_os_str().is_empty() {
                fs::create_dir_all(dir).context("Failed to create pricing directory")?;
            }
        }

        let tmp_path = self.path.with_extension("rci.tmp");
        let mut f = File::create(&tmp_path).context("Failed to create temp pricing file")?;

        writeln!(f, "CPU:{}", data.cpu)?;
        writeln!(f, "RAM:{}", data.ram)?;
        writeln!(f, "GPU:{}", data.gpu)?;
        writeln!(f, "STORAGE:{}", data.storage)?;
        writeln!(f, "SPOT_CPU:{}", data.spot_cpu)?;
        writeln!(f, "SPOT_RAM:{}", data.spot_ram)?;
        writeln!(f, "SPOT_GPU:{}", data.spot_gpu)?;
        writeln!(f, "CUSTOM_PRICES_ENABLED:{}", data.custom_prices_enabled)?;

        f.flush()?;
        f.sync_all().context("Failed to sync temp pricing file")?;
        fs::rename(&tmp_path, &self.path).context("Failed to finalize pricing file")?;

        Ok(())
    }
}
