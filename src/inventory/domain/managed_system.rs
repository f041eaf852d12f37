use crate::shared::Result;
use std::fmt;
use std::str::FromStr;

/// Machine type, model and serial number of a Power server.
///
/// Textual form is `TYPE-MODEL*SERIAL`, e.g. `9009-42A*7800AB1`. MTMS is the
/// hardware identity of a managed system and stays the same no matter which
/// HMC reports it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Mtms {
    machine_type: String,
    model: String,
    serial: String,
}

impl Mtms {
    pub fn new(
        machine_type: impl Into<String>,
        model: impl Into<String>,
        serial: impl Into<String>,
    ) -> Result<Self> {
        let mtms = Self {
            machine_type: machine_type.into(),
            model: model.into(),
            serial: serial.into(),
        };
        for (label, part) in [
            ("machine type", &mtms.machine_type),
            ("model", &mtms.model),
            ("serial", &mtms.serial),
        ] {
            if part.is_empty() || !part.chars().all(|c| c.is_ascii_alphanumeric()) {
                anyhow::bail!("Invalid MTMS {}: '{}'", label, part);
            }
        }
        Ok(mtms)
    }

    pub fn machine_type(&self) -> &str {
        &self.machine_type
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn serial(&self) -> &str {
        &self.serial
    }
}

impl FromStr for Mtms {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let (type_model, serial) = s
            .split_once('*')
            .ok_or_else(|| anyhow::anyhow!("MTMS '{}' is missing the '*' separator", s))?;
        let (machine_type, model) = type_model
            .split_once('-')
            .ok_or_else(|| anyhow::anyhow!("MTMS '{}' is missing the '-' separator", s))?;
        Mtms::new(machine_type, model, serial)
    }
}

impl fmt::Display for Mtms {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}*{}", self.machine_type, self.model, self.serial)
    }
}

/// A Power server as reported by one HMC
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManagedSystem {
    name: String,
    mtms: Mtms,
    uuid: String,
    hmc: String,
}

impl ManagedSystem {
    pub fn new(
        name: impl Into<String>,
        mtms: Mtms,
        uuid: impl Into<String>,
        hmc: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            mtms,
            uuid: uuid.into(),
            hmc: hmc.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn mtms(&self) -> &Mtms {
        &self.mtms
    }

    pub fn uuid(&self) -> &str {
        &self.uuid
    }

    /// Host of the HMC this system was listed from
    pub fn hmc(&self) -> &str {
        &self.hmc
    }
}
