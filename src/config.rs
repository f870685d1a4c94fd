// ============================================================
//  config.rs - Structurile de configurare și încărcarea TOML
// ============================================================
//
//  Fișierul de configurare este opțional; fiecare secțiune are
//  valori implicite, deci un fișier gol este valid.
//
//  [matching]
//  match_any = false
//  dialect = "cisco"
//  port_tail_window = 4
//
//  [services]
//  myapp = 8443
//
//  Concepte Rust demonstrate aici:
//  - `#[derive(Deserialize)]` + `#[serde(default)]`: câmpurile lipsă
//    din fișier iau valorile din `Default`
//  - `anyhow::Context` pentru erori de I/O și parsare cu calea fișierului
// ============================================================

use crate::parser::patterns::DEFAULT_PORT_TAIL_WINDOW;
use crate::parser::PatternSet;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;

// ---------------------------------------------------------------------------
// Configurația completă (rădăcina fișierului TOML)
// ---------------------------------------------------------------------------
#[derive(Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    pub matching: MatchingConfig,

    /// Nume de servicii suplimentare (nume -> port), peste tabela standard
    pub services: BTreeMap<String, u16>,
}

// ---------------------------------------------------------------------------
// Secțiunea [matching] - comportamentul grep și al extractorului
// ---------------------------------------------------------------------------
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct MatchingConfig {
    /// Valoarea implicită pentru `--any`
    pub match_any: bool,

    /// Dialectul de parser: "cisco" (sinonime "ios", "asa")
    pub dialect: String,

    /// Un port singular care se termină în ultimele N caractere ale liniei este port destinație
    pub port_tail_window: usize,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        MatchingConfig {
            match_any: false,
            dialect: "cisco".to_string(),
            port_tail_window: DEFAULT_PORT_TAIL_WINDOW,
        }
    }
}

impl Config {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| {
                format!("Nu s-a putut citi fișierul de configurare: '{}'", path.display())
            })?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Eroare la parsarea TOML din '{}'", path.display()))?;

        Ok(config)
    }

    /// Fișierul dat, sau valorile implicite dacă nu a fost specificat niciunul
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Config::default()),
        }
    }

    /// Construiește setul de pattern-uri o singură dată, pentru toată rularea
    pub fn pattern_set(&self) -> Result<Arc<PatternSet>> {
        if self.services.is_empty() && self.matching.port_tail_window == DEFAULT_PORT_TAIL_WINDOW {
            return Ok(PatternSet::standard());
        }
        let patterns = PatternSet::new(&self.services, self.matching.port_tail_window)
            .context("Nume de serviciu invalid în secțiunea [services]")?;
        Ok(Arc::new(patterns))
    }
}
