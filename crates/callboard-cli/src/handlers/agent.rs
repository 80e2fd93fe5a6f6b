use anyhow::{Result, bail};
use callboard_types::{AgentCreateInput, AgentUpdateInput, defaults, split_list};
use serde_json::json;

use crate::args::AgentFieldArgs;
use crate::context::ExecutionContext;
use crate::presentation::agents;

pub async fn list(ctx: &ExecutionContext) -> Result<()> {
    let profiles = ctx.authed_backend()?.list_agents().await?;
    ctx.emit(&profiles, |palette| agents::list(&profiles, palette))
}

pub async fn show(ctx: &ExecutionContext, id: &str) -> Result<()> {
    let agent = ctx.authed_backend()?.get_agent(id).await?;
    ctx.emit(&agent, |palette| agents::detail(&agent, palette))
}

pub async fn create(ctx: &ExecutionContext, name: String, fields: AgentFieldArgs) -> Result<()> {
    check_choices(&fields)?;
    let input = create_input(name, fields);
    let agent = ctx.authed_backend()?.create_agent(&input).await?;
    ctx.emit(&agent, |palette| {
        format!("Created agent {}\n\n{}", agent.id, agents::detail(&agent, palette))
    })
}

pub async fn update(
    ctx: &ExecutionContext,
    id: &str,
    name: Option<String>,
    active: Option<bool>,
    fields: AgentFieldArgs,
) -> Result<()> {
    check_choices(&fields)?;
    let input = update_input(name, active, fields);
    if input.is_empty() {
        bail!("Nothing to update; pass at least one option (see `callboard agent update --help`)");
    }
    let agent = ctx.authed_backend()?.update_agent(id, &input).await?;
    ctx.emit(&agent, |palette| {
        format!("Updated agent {}\n\n{}", agent.id, agents::detail(&agent, palette))
    })
}

pub async fn delete(ctx: &ExecutionContext, id: &str) -> Result<()> {
    ctx.authed_backend()?.delete_agent(id).await?;
    ctx.emit(&json!({ "deleted": id }), |_| {
        format!("Deactivated agent {}\n", id)
    })
}

fn check_choices(fields: &AgentFieldArgs) -> Result<()> {
    if let Some(voice) = &fields.voice
        && !defaults::VOICES.contains(&voice.as_str())
    {
        bail!(
            "Unknown voice '{}'. Available: {}",
            voice,
            defaults::VOICES.join(", ")
        );
    }
    if let Some(language) = &fields.language
        && !defaults::LANGUAGES.contains(&language.as_str())
    {
        bail!(
            "Unknown language '{}'. Available: {}",
            language,
            defaults::LANGUAGES.join(", ")
        );
    }
    Ok(())
}

/// Options the operator passed override the product defaults.
fn create_input(name: String, fields: AgentFieldArgs) -> AgentCreateInput {
    let mut input = AgentCreateInput::with_defaults(name);
    input.description = fields.description;
    if let Some(scenario) = fields.scenario {
        input.scenario_type = scenario.into();
    }
    if let Some(prompt) = fields.system_prompt {
        input.system_prompt = prompt;
    }
    if let Some(greeting) = fields.greeting {
        input.initial_greeting = greeting;
    }
    overlay(&mut input.voice_id, fields.voice);
    overlay(&mut input.language, fields.language);
    overlay(&mut input.enable_backchannel, fields.backchannel);
    overlay(
        &mut input.backchannel_words,
        fields.backchannel_words.as_deref().map(split_list),
    );
    overlay(&mut input.enable_filler_words, fields.filler_words_enabled);
    overlay(
        &mut input.filler_words,
        fields.filler_words.as_deref().map(split_list),
    );
    overlay(
        &mut input.interruption_sensitivity,
        fields.interruption_sensitivity,
    );
    overlay(&mut input.response_delay_ms, fields.response_delay_ms);
    overlay(&mut input.responsiveness, fields.responsiveness);
    overlay(&mut input.ambient_sound, fields.ambient_sound.map(Into::into));
    overlay(&mut input.ambient_sound_volume, fields.ambient_volume);
    overlay(
        &mut input.max_call_duration_seconds,
        fields.max_duration_secs,
    );
    overlay(&mut input.enable_auto_end_call, fields.auto_end_call);
    overlay(
        &mut input.end_call_after_silence_ms,
        fields.end_after_silence_ms,
    );
    overlay(
        &mut input.reminder_keywords,
        fields.reminder_keywords.as_deref().map(split_list),
    );
    overlay(&mut input.enable_reminder, fields.reminder);
    overlay(
        &mut input.emergency_keywords,
        fields.emergency_keywords.as_deref().map(split_list),
    );
    input
}

fn overlay<T>(slot: &mut Option<T>, value: Option<T>) {
    if value.is_some() {
        *slot = value;
    }
}

fn update_input(
    name: Option<String>,
    active: Option<bool>,
    fields: AgentFieldArgs,
) -> AgentUpdateInput {
    AgentUpdateInput {
        name,
        description: fields.description,
        scenario_type: fields.scenario.map(Into::into),
        system_prompt: fields.system_prompt,
        initial_greeting: fields.greeting,
        voice_id: fields.voice,
        language: fields.language,
        enable_backchannel: fields.backchannel,
        backchannel_words: fields.backchannel_words.as_deref().map(split_list),
        enable_filler_words: fields.filler_words_enabled,
        filler_words: fields.filler_words.as_deref().map(split_list),
        interruption_sensitivity: fields.interruption_sensitivity,
        response_delay_ms: fields.response_delay_ms,
        responsiveness: fields.responsiveness,
        ambient_sound: fields.ambient_sound.map(Into::into),
        ambient_sound_volume: fields.ambient_volume,
        max_call_duration_seconds: fields.max_duration_secs,
        enable_auto_end_call: fields.auto_end_call,
        end_call_after_silence_ms: fields.end_after_silence_ms,
        pronunciation_guide: None,
        reminder_keywords: fields.reminder_keywords.as_deref().map(split_list),
        enable_reminder: fields.reminder,
        emergency_keywords: fields.emergency_keywords.as_deref().map(split_list),
        is_active: active,
    }
}
