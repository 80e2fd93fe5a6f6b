use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::{Error, Result};

/// Product defaults applied to new agent profiles and to fields the backend omits.
pub mod defaults {
    pub const SYSTEM_PROMPT: &str = "You are a professional dispatch agent calling truck drivers about their loads. Your role is to gather information and handle any situation that arises during the call.

NORMAL CHECK-IN FLOW:
- Start with an open-ended question about their current status
- If driving: ask about location, ETA, and any delays
- If arrived: ask about unloading status and timeline
- Always remind them about the POD (Proof of Delivery) at the end
- Be conversational, professional, and adaptive

EMERGENCY PROTOCOL:
If the driver mentions ANY emergency (accident, blowout, breakdown, medical issue, injury, etc.):
1. IMMEDIATELY switch to emergency mode
2. Confirm: \"Are you safe right now?\"
3. Ask: \"Is anyone injured?\"
4. Get: \"What is your exact location?\"
5. Verify: \"Is the load secure?\"
6. Say: \"I'm connecting you to a human dispatcher right now for immediate assistance\"

CONVERSATION STYLE:
- Be professional but warm
- Handle unclear responses by politely asking them to repeat
- If one-word answers, gently probe for detail
- Stay calm at all times
- Adapt your questions based on their responses
- Never be pushy or aggressive";

    pub const INITIAL_GREETING: &str = "Hi {{driver_name}}, this is Dispatch with a check call on load {{load_number}}. Can you give me an update on your status?";

    pub const VOICE_ID: &str = "11labs-Adrian";
    pub const LANGUAGE: &str = "en-US";
    pub const BACKCHANNEL_WORDS: &[&str] = &["mm-hmm", "I see", "got it", "okay"];
    pub const FILLER_WORDS: &[&str] = &["um", "uh", "hmm", "let me see"];
    pub const INTERRUPTION_SENSITIVITY: f64 = 0.7;
    pub const RESPONSE_DELAY_MS: u32 = 800;
    pub const RESPONSIVENESS: f64 = 0.8;
    pub const AMBIENT_SOUND_VOLUME: f64 = 0.5;
    pub const MAX_CALL_DURATION_SECONDS: u32 = 600;
    pub const END_CALL_AFTER_SILENCE_MS: u32 = 10_000;
    pub const REMINDER_KEYWORDS: &[&str] = &["POD", "proof of delivery", "paperwork"];
    pub const EMERGENCY_KEYWORDS: &[&str] = &[
        "accident",
        "crash",
        "emergency",
        "help",
        "breakdown",
        "broke down",
        "medical",
        "injury",
        "blowout",
        "flat tire",
        "broke",
        "stuck",
    ];

    pub const VOICES: &[&str] = &[VOICE_ID];
    pub const LANGUAGES: &[&str] = &["en-US", "es-ES"];

    pub(crate) fn words(list: &[&str]) -> Vec<String> {
        list.iter().map(|w| w.to_string()).collect()
    }
}

/// Conversation scenario an agent profile is tuned for
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScenarioType {
    #[default]
    DriverCheckin,
    EmergencyProtocol,
}

impl ScenarioType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScenarioType::DriverCheckin => "driver_checkin",
            ScenarioType::EmergencyProtocol => "emergency_protocol",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ScenarioType::DriverCheckin => "Driver Check-in (Standard)",
            ScenarioType::EmergencyProtocol => "Emergency Protocol (Dynamic Pivot)",
        }
    }
}

impl fmt::Display for ScenarioType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AmbientSound {
    #[default]
    CallCenter,
    CoffeeShop,
    ConventionHall,
    SummerOutdoor,
    MountainOutdoor,
    StaticNoise,
    Off,
}

impl AmbientSound {
    pub fn as_str(&self) -> &'static str {
        match self {
            AmbientSound::CallCenter => "call-center",
            AmbientSound::CoffeeShop => "coffee-shop",
            AmbientSound::ConventionHall => "convention-hall",
            AmbientSound::SummerOutdoor => "summer-outdoor",
            AmbientSound::MountainOutdoor => "mountain-outdoor",
            AmbientSound::StaticNoise => "static-noise",
            AmbientSound::Off => "off",
        }
    }
}

impl fmt::Display for AmbientSound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn default_voice_id() -> String {
    defaults::VOICE_ID.to_string()
}
fn default_language() -> String {
    defaults::LANGUAGE.to_string()
}
fn default_true() -> bool {
    true
}
fn default_backchannel_words() -> Vec<String> {
    defaults::words(defaults::BACKCHANNEL_WORDS)
}
fn default_filler_words() -> Vec<String> {
    defaults::words(defaults::FILLER_WORDS)
}
fn default_interruption_sensitivity() -> f64 {
    defaults::INTERRUPTION_SENSITIVITY
}
fn default_response_delay_ms() -> u32 {
    defaults::RESPONSE_DELAY_MS
}
fn default_responsiveness() -> f64 {
    defaults::RESPONSIVENESS
}
fn default_ambient_sound_volume() -> f64 {
    defaults::AMBIENT_SOUND_VOLUME
}
fn default_max_call_duration_seconds() -> u32 {
    defaults::MAX_CALL_DURATION_SECONDS
}
fn default_end_call_after_silence_ms() -> u32 {
    defaults::END_CALL_AFTER_SILENCE_MS
}
fn default_reminder_keywords() -> Vec<String> {
    defaults::words(defaults::REMINDER_KEYWORDS)
}
fn default_emergency_keywords() -> Vec<String> {
    defaults::words(defaults::EMERGENCY_KEYWORDS)
}

/// A stored agent configuration profile.
///
/// Older backend revisions only persist a subset of the tuning knobs; any knob
/// the backend leaves out deserializes to the product default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentConfiguration {
    pub id: String,
    pub user_id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub scenario_type: ScenarioType,
    pub system_prompt: String,
    pub initial_greeting: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retell_agent_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retell_llm_id: Option<String>,
    #[serde(default = "default_voice_id")]
    pub voice_id: String,
    #[serde(default = "default_language")]
    pub language: String,
    #[serde(default = "default_true")]
    pub enable_backchannel: bool,
    #[serde(default = "default_backchannel_words")]
    pub backchannel_words: Vec<String>,
    #[serde(default = "default_true")]
    pub enable_filler_words: bool,
    #[serde(default = "default_filler_words")]
    pub filler_words: Vec<String>,
    #[serde(default = "default_interruption_sensitivity")]
    pub interruption_sensitivity: f64,
    #[serde(default = "default_response_delay_ms")]
    pub response_delay_ms: u32,
    #[serde(default = "default_responsiveness")]
    pub responsiveness: f64,
    #[serde(default)]
    pub ambient_sound: AmbientSound,
    #[serde(default = "default_ambient_sound_volume")]
    pub ambient_sound_volume: f64,
    #[serde(default = "default_max_call_duration_seconds")]
    pub max_call_duration_seconds: u32,
    #[serde(default = "default_true")]
    pub enable_auto_end_call: bool,
    #[serde(default = "default_end_call_after_silence_ms")]
    pub end_call_after_silence_ms: u32,
    #[serde(default)]
    pub pronunciation_guide: BTreeMap<String, String>,
    #[serde(default = "default_reminder_keywords")]
    pub reminder_keywords: Vec<String>,
    #[serde(default = "default_true")]
    pub enable_reminder: bool,
    #[serde(default = "default_emergency_keywords")]
    pub emergency_keywords: Vec<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Payload for `POST /agents`. Unset knobs are omitted so the backend applies its defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AgentCreateInput {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub scenario_type: ScenarioType,
    pub system_prompt: String,
    pub initial_greeting: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub voice_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enable_backchannel: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backchannel_words: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enable_filler_words: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filler_words: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interruption_sensitivity: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_delay_ms: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub responsiveness: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ambient_sound: Option<AmbientSound>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ambient_sound_volume: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_call_duration_seconds: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enable_auto_end_call: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_call_after_silence_ms: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pronunciation_guide: Option<BTreeMap<String, String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reminder_keywords: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enable_reminder: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emergency_keywords: Option<Vec<String>>,
}

impl AgentCreateInput {
    /// A fully populated profile carrying every product default.
    pub fn with_defaults(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            scenario_type: ScenarioType::DriverCheckin,
            system_prompt: defaults::SYSTEM_PROMPT.to_string(),
            initial_greeting: defaults::INITIAL_GREETING.to_string(),
            voice_id: Some(default_voice_id()),
            language: Some(default_language()),
            enable_backchannel: Some(true),
            backchannel_words: Some(default_backchannel_words()),
            enable_filler_words: Some(true),
            filler_words: Some(default_filler_words()),
            interruption_sensitivity: Some(defaults::INTERRUPTION_SENSITIVITY),
            response_delay_ms: Some(defaults::RESPONSE_DELAY_MS),
            responsiveness: Some(defaults::RESPONSIVENESS),
            ambient_sound: Some(AmbientSound::CallCenter),
            ambient_sound_volume: Some(defaults::AMBIENT_SOUND_VOLUME),
            max_call_duration_seconds: Some(defaults::MAX_CALL_DURATION_SECONDS),
            enable_auto_end_call: Some(true),
            end_call_after_silence_ms: Some(defaults::END_CALL_AFTER_SILENCE_MS),
            pronunciation_guide: Some(BTreeMap::new()),
            reminder_keywords: Some(default_reminder_keywords()),
            enable_reminder: Some(true),
            emergency_keywords: Some(default_emergency_keywords()),
        }
    }

    pub fn validate(&self) -> Result<()> {
        require_text("name", &self.name)?;
        require_text("system_prompt", &self.system_prompt)?;
        require_text("initial_greeting", &self.initial_greeting)?;
        check_unit_range("interruption_sensitivity", self.interruption_sensitivity)?;
        check_unit_range("responsiveness", self.responsiveness)?;
        check_unit_range("ambient_sound_volume", self.ambient_sound_volume)?;
        Ok(())
    }
}

/// Payload for `PATCH /agents/{id}`. Only the fields that are set get sent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AgentUpdateInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scenario_type: Option<ScenarioType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_prompt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initial_greeting: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub voice_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enable_backchannel: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backchannel_words: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enable_filler_words: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filler_words: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interruption_sensitivity: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_delay_ms: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub responsiveness: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ambient_sound: Option<AmbientSound>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ambient_sound_volume: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_call_duration_seconds: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enable_auto_end_call: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_call_after_silence_ms: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pronunciation_guide: Option<BTreeMap<String, String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reminder_keywords: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enable_reminder: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emergency_keywords: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

impl AgentUpdateInput {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn validate(&self) -> Result<()> {
        if let Some(name) = &self.name {
            require_text("name", name)?;
        }
        if let Some(prompt) = &self.system_prompt {
            require_text("system_prompt", prompt)?;
        }
        if let Some(greeting) = &self.initial_greeting {
            require_text("initial_greeting", greeting)?;
        }
        check_unit_range("interruption_sensitivity", self.interruption_sensitivity)?;
        check_unit_range("responsiveness", self.responsiveness)?;
        check_unit_range("ambient_sound_volume", self.ambient_sound_volume)?;
        Ok(())
    }
}

fn require_text(field: &'static str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(Error::validation(field, "must not be empty"));
    }
    Ok(())
}

fn check_unit_range(field: &'static str, value: Option<f64>) -> Result<()> {
    match value {
        Some(v) if !(0.0..=1.0).contains(&v) => Err(Error::validation(
            field,
            format!("{} is outside the range 0.0..=1.0", v),
        )),
        _ => Ok(()),
    }
}
