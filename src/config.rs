use std::path::PathBuf;

use clap::Parser;

use crate::data::model::{DatasetKey, ParseMode};

// ---------------------------------------------------------------------------
// Command line / environment configuration
// ---------------------------------------------------------------------------

/// Annual air-quality and asthma hospitalization trends for one region.
#[derive(Debug, Clone, Parser)]
#[command(name = "air-asthma-trends", version, about)]
pub struct Config {
    /// Directory the dataset file names are resolved against.
    #[arg(long, env = "TRENDS_DATA_DIR", default_value = ".")]
    pub data_dir: PathBuf,

    /// Benzene table (date_local, arithmetic_mean).
    #[arg(long, env = "TRENDS_BENZENE", default_value = "Suffolk County Benzene Trends 2000-2024.csv")]
    pub benzene: PathBuf,

    /// NO2 table (date_local, arithmetic_mean).
    #[arg(long, env = "TRENDS_NO2", default_value = "Suffolk County NO2 Trends 2000-2024.csv")]
    pub no2: PathBuf,

    /// Ozone table (date_local, arithmetic_mean).
    #[arg(long, env = "TRENDS_OZONE", default_value = "Suffolk County Ozone Trends 2000-2024.csv")]
    pub ozone: PathBuf,

    /// Asthma hospitalization table (Year, Case Count).
    #[arg(
        long,
        env = "TRENDS_HOSPITALIZATIONS",
        default_value = "Suffolk County Asthma Hospitalizations 2000-2021.csv"
    )]
    pub hospitalizations: PathBuf,

    /// Region name shown in titles.
    #[arg(long, env = "TRENDS_REGION", default_value = "Suffolk County")]
    pub region: String,

    /// Skip malformed rows instead of refusing to start.
    #[arg(long, env = "TRENDS_LENIENT")]
    pub lenient: bool,

    /// Pollutant shown at startup (Benzene, NO2 or Ozone).
    #[arg(long, env = "TRENDS_INITIAL", default_value = "Ozone", value_parser = parse_pollutant)]
    pub initial: DatasetKey,
}

impl Config {
    pub fn parse_mode(&self) -> ParseMode {
        if self.lenient {
            ParseMode::Lenient
        } else {
            ParseMode::Strict
        }
    }

    /// Full path of every dataset file. Absolute overrides are kept as is.
    pub fn dataset_paths(&self) -> Vec<(DatasetKey, PathBuf)> {
        DatasetKey::ALL
            .into_iter()
            .map(|key| {
                let file = match key {
                    DatasetKey::Benzene => &self.benzene,
                    DatasetKey::No2 => &self.no2,
                    DatasetKey::Ozone => &self.ozone,
                    DatasetKey::Hospitalizations => &self.hospitalizations,
                };
                (key, self.data_dir.join(file))
            })
            .collect()
    }

    pub fn window_title(&self) -> String {
        format!("{} Air Quality & Asthma Trends", self.region)
    }
}

fn parse_pollutant(s: &str) -> Result<DatasetKey, String> {
    let key: DatasetKey = s.parse()?;
    if !key.is_pollutant() {
        return Err(format!("{key} cannot be selected; choose Benzene, NO2 or Ozone"));
    }
    Ok(key)
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;

    #[test]
    fn test_defaults_match_source_file_names() {
        let config = Config::try_parse_from(["air-asthma-trends"]).unwrap();

        assert_eq!(config.region, "Suffolk County");
        assert_eq!(config.initial, DatasetKey::Ozone);
        assert_eq!(config.parse_mode(), ParseMode::Strict);

        let paths = config.dataset_paths();
        assert_eq!(paths.len(), 4);
        assert_eq!(
            paths[3],
            (
                DatasetKey::Hospitalizations,
                PathBuf::from("./Suffolk County Asthma Hospitalizations 2000-2021.csv")
            )
        );
    }

    #[test]
    fn test_overrides() {
        let config = Config::try_parse_from([
            "air-asthma-trends",
            "--data-dir",
            "/data",
            "--ozone",
            "/elsewhere/ozone.parquet",
            "--lenient",
            "--initial",
            "no2",
            "--region",
            "Nassau County",
        ])
        .unwrap();

        assert_eq!(config.parse_mode(), ParseMode::Lenient);
        assert_eq!(config.initial, DatasetKey::No2);
        assert_eq!(config.window_title(), "Nassau County Air Quality & Asthma Trends");

        let paths = config.dataset_paths();
        assert_eq!(paths[2].1, Path::new("/elsewhere/ozone.parquet"));
        assert!(paths[0].1.starts_with("/data"));
    }

    #[test]
    fn test_initial_must_be_pollutant() {
        let result = Config::try_parse_from(["air-asthma-trends", "--initial", "Hospitalizations"]);
        assert!(result.is_err());
    }
}
