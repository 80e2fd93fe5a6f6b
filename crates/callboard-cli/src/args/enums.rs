use callboard_types::{AmbientSound, ScenarioType};
use clap::ValueEnum;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "lowercase")]
pub enum OutputFormat {
    Plain,
    Json,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Plain => write!(f, "plain"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogLevel::Error => write!(f, "error"),
            LogLevel::Warn => write!(f, "warn"),
            LogLevel::Info => write!(f, "info"),
            LogLevel::Debug => write!(f, "debug"),
            LogLevel::Trace => write!(f, "trace"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "snake_case")]
pub enum ScenarioArg {
    DriverCheckin,
    EmergencyProtocol,
}

impl From<ScenarioArg> for ScenarioType {
    fn from(arg: ScenarioArg) -> Self {
        match arg {
            ScenarioArg::DriverCheckin => ScenarioType::DriverCheckin,
            ScenarioArg::EmergencyProtocol => ScenarioType::EmergencyProtocol,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "kebab-case")]
pub enum AmbientSoundArg {
    CallCenter,
    CoffeeShop,
    ConventionHall,
    SummerOutdoor,
    MountainOutdoor,
    StaticNoise,
    Off,
}

impl From<AmbientSoundArg> for AmbientSound {
    fn from(arg: AmbientSoundArg) -> Self {
        match arg {
            AmbientSoundArg::CallCenter => AmbientSound::CallCenter,
            AmbientSoundArg::CoffeeShop => AmbientSound::CoffeeShop,
            AmbientSoundArg::ConventionHall => AmbientSound::ConventionHall,
            AmbientSoundArg::SummerOutdoor => AmbientSound::SummerOutdoor,
            AmbientSoundArg::MountainOutdoor => AmbientSound::MountainOutdoor,
            AmbientSoundArg::StaticNoise => AmbientSound::StaticNoise,
            AmbientSoundArg::Off => AmbientSound::Off,
        }
    }
}
