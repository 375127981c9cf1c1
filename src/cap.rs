use crate::{
    input::{InputSource, INPUT_SELECT_CODE},
    parse, Error, Result,
};

/// A VCP code from a capabilities string, with the values it accepts if the
/// monitor lists any.
#[derive(Debug, PartialEq)]
pub struct VcpFeature {
    pub code: u8,
    pub values: Vec<u8>,
}

#[derive(Debug, PartialEq)]
pub struct Capabilities {
    pub vcp: Vec<VcpFeature>,
}

impl Capabilities {
    pub fn parse(s: &str) -> Result<Capabilities> {
        Ok(Capabilities {
            vcp: parse::parse(s)?,
        })
    }

    pub fn supports_input_select(&self) -> bool {
        self.feature(INPUT_SELECT_CODE).is_some()
    }

    /// Returns the input select values the monitor advertises. An empty slice
    /// means the monitor didn't list any.
    pub fn input_values(&self) -> &[u8] {
        self.feature(INPUT_SELECT_CODE)
            .map(|feature| feature.values.as_slice())
            .unwrap_or_default()
    }

    /// Fails if the monitor lists input select values and `input` isn't one of
    /// them. Monitors that don't list values are given the benefit of the
    /// doubt.
    pub fn check_input(&self, input: InputSource) -> Result<()> {
        let values = self.input_values();
        if values.is_empty() || values.contains(&input.code()) {
            return Ok(());
        }

        Err(Error::InputNotAdvertised {
            input,
            advertised: values.to_vec(),
        })
    }

    fn feature(&self, code: u8) -> Option<&VcpFeature> {
        self.vcp.iter().find(|feature| feature.code == code)
    }
}
