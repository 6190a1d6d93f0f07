// Copyright 2026 Daniel Pelikan
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Line-based console commands.

use anyhow::{anyhow, bail, Result};

use crate::surface::{Button, Switch, SurfaceSet};

/// A parsed console line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleCommand {
    On(String),
    Off(String),
    Toggle(String),
    Press(String),
    List,
    Quit,
}

impl ConsoleCommand {
    /// Parse one line. Verbs are case-insensitive, keys are not.
    pub fn parse(line: &str) -> Option<Self> {
        let mut words = line.split_whitespace();
        let verb = words.next()?.to_lowercase();
        let key = words.next().map(str::to_string);
        if words.next().is_some() {
            return None;
        }

        match (verb.as_str(), key) {
            ("on", Some(key)) => Some(Self::On(key)),
            ("off", Some(key)) => Some(Self::Off(key)),
            ("toggle", Some(key)) => Some(Self::Toggle(key)),
            ("press", Some(key)) => Some(Self::Press(key)),
            ("list", None) => Some(Self::List),
            ("quit" | "exit" | ":q!", None) => Some(Self::Quit),
            _ => None,
        }
    }

    /// Run against `surfaces`, returning the text to show.
    pub fn execute(&self, surfaces: &SurfaceSet) -> Result<String> {
        match self {
            Self::On(key) => {
                let switch = usable_switch(surfaces, key)?;
                switch.turn_on();
                Ok(format!("{} -> on", key))
            }
            Self::Off(key) => {
                let switch = usable_switch(surfaces, key)?;
                switch.turn_off();
                Ok(format!("{} -> off", key))
            }
            Self::Toggle(key) => {
                let on = usable_switch(surfaces, key)?.toggle();
                Ok(format!("{} -> {}", key, if on { "on" } else { "off" }))
            }
            Self::Press(key) => {
                let button = usable_button(surfaces, key)?;
                button.press();
                Ok(format!("{} pressed", key))
            }
            Self::List => Ok(serde_json::to_string_pretty(&surfaces.snapshot())?),
            Self::Quit => Ok("bye".to_string()),
        }
    }
}

fn usable_switch<'a>(surfaces: &'a SurfaceSet, key: &str) -> Result<&'a Switch> {
    let switch = surfaces
        .switch(key)
        .ok_or_else(|| anyhow!("No switch named '{}'", key))?;
    if !switch.available() {
        bail!("Switch '{}' is unavailable", key);
    }
    Ok(switch)
}

fn usable_button<'a>(surfaces: &'a SurfaceSet, key: &str) -> Result<&'a Button> {
    let button = surfaces
        .button(key)
        .ok_or_else(|| anyhow!("No button named '{}'", key))?;
    if !button.available() {
        bail!("Button '{}' is unavailable", key);
    }
    Ok(button)
}
