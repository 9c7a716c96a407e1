use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use weekwise_core::{DistributorParams, TimeOfDay, WorkWindow};

use crate::state::ensure_weekwise_home;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub schedule: ScheduleSection,
    pub llm: LlmSection,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScheduleSection {
    /// "HH:MM" start of the working window.
    pub work_start: String,
    /// "HH:MM" end of the working window.
    pub work_end: String,
    pub buffer_minutes: u32,
    /// Fraction of the window treated as schedulable capacity per day.
    pub capacity_utilization: f32,
    /// IANA timezone used to resolve schedule slots for export.
    pub timezone: String,
    /// When true, daily recurring tasks skip Saturday and Sunday.
    pub weekday_only_daily: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmSection {
    /// "anthropic" or "openai".
    pub provider: String,
    pub model: String,
    pub max_tokens: i32,
    pub temperature: f32,
    pub timeout_secs: u64,
}

impl Default for ScheduleSection {
    fn default() -> Self {
        Self {
            work_start: "09:00".to_string(),
            work_end: "17:00".to_string(),
            buffer_minutes: 15,
            capacity_utilization: 0.8,
            timezone: "America/Chicago".to_string(),
            weekday_only_daily: false,
        }
    }
}

impl Default for LlmSection {
    fn default() -> Self {
        Self {
            provider: "anthropic".to_string(),
            model: "claude-3-5-sonnet-latest".to_string(),
            max_tokens: 1000,
            temperature: 0.4,
            timeout_secs: 30,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            schedule: ScheduleSection::default(),
            llm: LlmSection::default(),
        }
    }
}

impl ScheduleSection {
    pub fn work_window(&self) -> Result<WorkWindow> {
        let start = TimeOfDay::parse(&self.work_start)
            .with_context(|| format!("config work_start '{}'", self.work_start))?;
        let end = TimeOfDay::parse(&self.work_end)
            .with_context(|| format!("config work_end '{}'", self.work_end))?;
        Ok(WorkWindow::new(start, end.minutes_from_midnight())?)
    }

    pub fn distributor_params(&self, window: WorkWindow) -> DistributorParams {
        let utilization = self.capacity_utilization.clamp(0.1, 1.0);
        DistributorParams {
            window,
            buffer_minutes: self.buffer_minutes,
            daily_capacity_minutes: (window.len_minutes() as f32 * utilization) as u32,
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    Ok(ensure_weekwise_home()?.join("config.toml"))
}

pub fn load_config() -> Result<Config> {
    let p = config_path()?;
    if !p.exists() {
        return Ok(Config::default());
    }
    let s = fs::read_to_string(&p).with_context(|| format!("read {}", p.display()))?;
    Ok(toml::from_str(&s).context("parse config.toml")?)
}

pub fn save_config(cfg: &Config) -> Result<()> {
    let p = config_path()?;
    let s = toml::to_string_pretty(cfg).context("serialize config")?;
    fs::write(&p, s).with_context(|| format!("write {}", p.display()))?;
    Ok(())
}

pub fn init_config() -> Result<()> {
    let p = config_path()?;
    if p.exists() {
        println!("Config already exists: {}", p.display());
        return Ok(());
    }
    let cfg = Config::default();
    save_config(&cfg)?;
    println!("Wrote {}", p.display());
    Ok(())
}
