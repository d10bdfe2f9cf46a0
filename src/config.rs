use anyhow::{Result, anyhow};
use directories::UserDirs;
use log::info;
use serde::Deserialize;
use std::{
    collections::HashMap,
    fs,
    io::Write,
    path::PathBuf,
};

#[derive(Debug, Clone, Deserialize)]
pub struct Meta {
    pub name: Option<String>,
}

/// Expected pen travel for one letter. `critical_points` are normalized
/// landmarks carried by the table format but not consumed by scoring yet.
#[derive(Debug, Clone, Deserialize)]
pub struct LetterProfile {
    pub directions: String,
    #[serde(default)]
    pub critical_points: Vec<(f32, f32)>,
}

#[derive(Debug, Clone, Deserialize)]
struct AlphabetFile {
    meta: Meta,
    letters: HashMap<String, LetterProfile>,
}

/// A validated letter-profile table. The analyzer takes one of these by
/// value; callers may build their own to extend coverage beyond the shipped
/// A-E table.
#[derive(Debug, Clone)]
pub struct Alphabet {
    pub name: String,
    letters: HashMap<char, LetterProfile>,
}

impl Alphabet {
    pub fn from_entries(
        name: &str,
        entries: impl IntoIterator<Item = (char, LetterProfile)>,
    ) -> Self {
        Self {
            name: name.to_string(),
            letters: entries.into_iter().collect(),
        }
    }

    pub fn profile(&self, letter: char) -> Option<&LetterProfile> {
        self.letters.get(&letter)
    }

    pub fn covered(&self) -> Vec<char> {
        let mut v: Vec<char> = self.letters.keys().copied().collect();
        v.sort_unstable();
        v
    }

    pub fn missing_letters(&self) -> Vec<char> {
        ('A'..='Z').filter(|c| !self.letters.contains_key(c)).collect()
    }
}

/// On-disk alphabet tables plus the pointer to the active one.
#[derive(Debug, Clone)]
pub struct AlphabetStore {
    pub active_name: String,
    pub alphabet: Alphabet,
    pub config_dir: PathBuf,
    pub alphabets_dir: PathBuf,
    pub active_ptr: PathBuf,
}

fn config_dir() -> PathBuf {
    let home = UserDirs::new().unwrap().home_dir().to_path_buf();
    home.join(".config").join("inkcoach")
}

fn alphabets_dir() -> PathBuf {
    config_dir().join("alphabets")
}

fn active_ptr_path() -> PathBuf {
    config_dir().join("active")
}

pub fn default_alphabet_text() -> &'static str {
    include_str!("../alphabets/default.toml")
}

impl AlphabetStore {
    pub fn load_or_install_default() -> Result<Self> {
        let cfgdir = config_dir();
        let alphdir = alphabets_dir();
        fs::create_dir_all(&alphdir)?;

        let def_path = alphdir.join("default.toml");
        if !def_path.exists() {
            fs::write(&def_path, default_alphabet_text())?;
            info!("installed default alphabet at {}", def_path.display());
        }

        let active_ptr = active_ptr_path();
        if !active_ptr.exists() {
            let mut f = fs::File::create(&active_ptr)?;
            f.write_all(b"default")?;
        }

        let active_name = fs::read_to_string(&active_ptr)?.trim().to_string();
        let alphabet = Self::load_alphabet(&active_name)?;

        Ok(Self {
            active_name,
            alphabet,
            config_dir: cfgdir,
            alphabets_dir: alphdir,
            active_ptr,
        })
    }

    pub fn reload(&mut self) -> Result<()> {
        self.alphabet = Self::load_alphabet(&self.active_name)?;
        Ok(())
    }

    pub fn set_active(&mut self, name: &str) -> Result<()> {
        let p = self.alphabets_dir.join(format!("{name}.toml"));
        if !p.exists() {
            return Err(anyhow!("alphabet not found: {}", p.display()));
        }
        fs::write(&self.active_ptr, name.as_bytes())?;
        self.active_name = name.to_string();
        self.reload()?;
        Ok(())
    }

    pub fn list_alphabets(&self) -> Vec<String> {
        let mut v = Vec::new();
        if let Ok(rd) = fs::read_dir(&self.alphabets_dir) {
            for e in rd.flatten() {
                if let Some(ext) = e.path().extension() {
                    if ext == "toml" {
                        if let Some(stem) = e.path().file_stem().and_then(|s| s.to_str()) {
                            v.push(stem.to_string());
                        }
                    }
                }
            }
        }
        v.sort();
        v
    }

    fn load_alphabet(name: &str) -> Result<Alphabet> {
        let path = alphabets_dir().join(format!("{name}.toml"));
        let txt = fs::read_to_string(&path)
            .map_err(|e| anyhow!("failed to read {}: {e}", path.display()))?;
        parse_alphabet(name, &txt)
            .map_err(|e| anyhow!("invalid alphabet {}: {e}", path.display()))
    }

    pub fn doctor_report(&self, devices: &[crate::input::DeviceInfo]) -> serde_json::Value {
        let covered: String = self.alphabet.covered().into_iter().collect();
        let missing: String = self.alphabet.missing_letters().into_iter().collect();
        serde_json::json!({
            "config_dir": self.config_dir,
            "alphabets_dir": self.alphabets_dir,
            "active_alphabet": self.active_name,
            "covered_letters": covered,
            "uncovered_letters": missing,
            "input_group_member": check_in_input_group(),
            "devices": devices
                .iter()
                .map(|d| format!("{} ({})", d.name, d.path))
                .collect::<Vec<_>>(),
            "hints": {
                "extend_coverage": "add [letters.X] tables to the active alphabet file",
                "add_user_to_input_group": "sudo usermod -aG input $USER && newgrp input"
            }
        })
    }
}

pub fn parse_alphabet(fallback_name: &str, text: &str) -> Result<Alphabet> {
    let file: AlphabetFile =
        toml::from_str(text).map_err(|e| anyhow!("parse error: {e}"))?;

    let mut letters = HashMap::new();
    for (key, profile) in file.letters {
        let mut chars = key.chars();
        let letter = match (chars.next(), chars.next()) {
            (Some(c), None) if c.is_ascii_uppercase() => c,
            _ => {
                return Err(anyhow!(
                    "letter key '{key}' must be a single uppercase ASCII letter"
                ));
            }
        };
        if profile.directions.is_empty() {
            return Err(anyhow!("letter '{letter}' has an empty direction string"));
        }
        if let Some(bad) = profile
            .directions
            .chars()
            .find(|c| !matches!(c, 'U' | 'D' | 'L' | 'R'))
        {
            return Err(anyhow!(
                "letter '{letter}' has direction char '{bad}' outside U/D/L/R"
            ));
        }
        for &(x, y) in &profile.critical_points {
            if !(0.0..=1.0).contains(&x) || !(0.0..=1.0).contains(&y) {
                return Err(anyhow!(
                    "letter '{letter}' has critical point ({x}, {y}) outside [0,1]"
                ));
            }
        }
        letters.insert(letter, profile);
    }
    if letters.is_empty() {
        return Err(anyhow!("alphabet defines no letters"));
    }

    let name = file.meta.name.unwrap_or_else(|| fallback_name.to_string());
    Ok(Alphabet { name, letters })
}

fn check_in_input_group() -> bool {
    let Ok(groups) = fs::read_to_string("/etc/group") else {
        return false;
    };
    let user = whoami::username();
    groups
        .lines()
        .filter(|l| l.starts_with("input:"))
        .any(|l| {
            l.rsplit(':')
                .next()
                .unwrap_or("")
                .split(',')
                .any(|u| u == user)
        })
}
