use clap::ValueEnum;

/// Cell lines profiled in the LINCS L1000 phase II data that we
/// keep a candidate expression profile for
#[allow(clippy::upper_case_acronyms)]
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[clap(rename_all = "verbatim")]
pub enum CellLine {
    A375,
    A549,
    HCC515,
    HEPG2,
    HT29,
    MCF7,
    PC3,
    YAPC,
}

impl CellLine {
    pub const ALL: [CellLine; 8] = [
        CellLine::A375,
        CellLine::A549,
        CellLine::HCC515,
        CellLine::HEPG2,
        CellLine::HT29,
        CellLine::MCF7,
        CellLine::PC3,
        CellLine::YAPC,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            CellLine::A375 => "A375",
            CellLine::A549 => "A549",
            CellLine::HCC515 => "HCC515",
            CellLine::HEPG2 => "HEPG2",
            CellLine::HT29 => "HT29",
            CellLine::MCF7 => "MCF7",
            CellLine::PC3 => "PC3",
            CellLine::YAPC => "YAPC",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            CellLine::A375 => "malignant melanoma",
            CellLine::A549 => "non-small cell lung carcinoma",
            CellLine::HCC515 => "non-small cell lung adenocarcinoma",
            CellLine::HEPG2 => "hepatocellular carcinoma",
            CellLine::HT29 => "colorectal adenocarcinoma",
            CellLine::MCF7 => "breast adenocarcinoma",
            CellLine::PC3 => "prostate adenocarcinoma",
            CellLine::YAPC => "pancreatic carcinoma",
        }
    }
}

impl std::fmt::Display for CellLine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl std::str::FromStr for CellLine {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        CellLine::ALL
            .iter()
            .find(|c| c.name() == s.trim())
            .copied()
            .ok_or(anyhow::anyhow!("Unacceptable cell type: {}", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip() {
        for c in CellLine::ALL {
            assert_eq!(c.name().parse::<CellLine>().unwrap(), c);
        }
        assert!("HeLa".parse::<CellLine>().is_err());
    }

    #[test]
    fn clap_accepts_verbatim_names() {
        let c = <CellLine as ValueEnum>::from_str("HEPG2", false).unwrap();
        assert_eq!(c, CellLine::HEPG2);
        assert!(<CellLine as ValueEnum>::from_str("hepg2", false).is_err());
    }
}
