use callboard_types::{AgentConfiguration, join_list};
use std::fmt::Write;

use super::{Palette, hint};
use crate::args::hints::cmd;

pub fn list(agents: &[AgentConfiguration], palette: Palette) -> String {
    if agents.is_empty() {
        return format!(
            "No agents configured yet.\n{}\n",
            hint(palette, "Create one", cmd::AGENT_CREATE)
        );
    }

    let mut out = String::new();
    for agent in agents {
        let state = if agent.is_active {
            palette.good("active")
        } else {
            palette.muted("inactive")
        };
        let _ = writeln!(
            out,
            "{}  {}  {}  {}",
            palette.heading(&agent.name),
            palette.muted(&agent.id),
            agent.scenario_type.label(),
            state
        );
    }
    out
}

pub fn detail(agent: &AgentConfiguration, palette: Palette) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", palette.heading(&agent.name));
    let _ = writeln!(out, "  ID:            {}", agent.id);
    if let Some(description) = &agent.description {
        let _ = writeln!(out, "  Description:   {}", description);
    }
    let _ = writeln!(out, "  Scenario:      {}", agent.scenario_type.label());
    let _ = writeln!(out, "  Voice:         {} ({})", agent.voice_id, agent.language);
    let _ = writeln!(
        out,
        "  Active:        {}",
        if agent.is_active { "yes" } else { "no" }
    );
    if let Some(retell_agent_id) = &agent.retell_agent_id {
        let _ = writeln!(out, "  Voice agent:   {}", retell_agent_id);
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "{}", palette.heading("Conversation"));
    let _ = writeln!(out, "  Greeting:      {}", agent.initial_greeting);
    let _ = writeln!(
        out,
        "  Backchannel:   {}",
        toggled(agent.enable_backchannel, &agent.backchannel_words)
    );
    let _ = writeln!(
        out,
        "  Filler words:  {}",
        toggled(agent.enable_filler_words, &agent.filler_words)
    );
    let _ = writeln!(
        out,
        "  Interruption:  {:.2}  Responsiveness: {:.2}  Delay: {} ms",
        agent.interruption_sensitivity, agent.responsiveness, agent.response_delay_ms
    );
    let _ = writeln!(
        out,
        "  Ambient:       {} at {:.2}",
        agent.ambient_sound, agent.ambient_sound_volume
    );
    let _ = writeln!(
        out,
        "  Max duration:  {} s  Auto end: {} after {} ms silence",
        agent.max_call_duration_seconds,
        if agent.enable_auto_end_call { "on" } else { "off" },
        agent.end_call_after_silence_ms
    );
    let _ = writeln!(
        out,
        "  Reminders:     {}",
        toggled(agent.enable_reminder, &agent.reminder_keywords)
    );
    let _ = writeln!(
        out,
        "  Emergency:     {}",
        join_list(&agent.emergency_keywords)
    );
    if !agent.pronunciation_guide.is_empty() {
        let _ = writeln!(out, "  Pronunciation:");
        for (word, spoken) in &agent.pronunciation_guide {
            let _ = writeln!(out, "    {} -> {}", word, spoken);
        }
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "{}", palette.heading("System prompt"));
    for line in agent.system_prompt.lines() {
        let _ = writeln!(out, "  {}", line);
    }
    out
}

fn toggled(enabled: bool, words: &[String]) -> String {
    if enabled {
        join_list(words)
    } else {
        "off".to_string()
    }
}
