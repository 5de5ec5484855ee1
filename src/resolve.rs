//! Asset resolution - mapping bare asset names from script lines to URLs.
//!
//! No check is made that a produced URL actually resolves.

use crate::config::AssetConfig;

pub trait AssetResolver: Send + Sync {
    fn background_url(&self, name: &str) -> Option<String> {
        let _ = name;
        None
    }

    fn bgm_url(&self, name: &str) -> Option<String> {
        let _ = name;
        None
    }

    fn se_url(&self, name: &str) -> Option<String> {
        let _ = name;
        None
    }

    fn portrait_url(&self, icon: &str) -> Option<String> {
        let _ = icon;
        None
    }
}

/// Resolver that leaves every name untouched
#[derive(Debug, Default, Clone, Copy)]
pub struct BareNames;

impl AssetResolver for BareNames {
    fn background_url(&self, name: &str) -> Option<String> {
        Some(name.to_string())
    }

    fn bgm_url(&self, name: &str) -> Option<String> {
        Some(name.to_string())
    }

    fn se_url(&self, name: &str) -> Option<String> {
        Some(name.to_string())
    }

    fn portrait_url(&self, icon: &str) -> Option<String> {
        Some(icon.to_string())
    }
}

/// `{base_url}/{dir}/{name}{ext}` templating
#[derive(Debug, Clone)]
pub struct TemplateResolver {
    config: AssetConfig,
}

impl TemplateResolver {
    pub fn new(config: AssetConfig) -> Self {
        Self { config }
    }

    fn template(&self, dir: &str, name: &str, ext: &str) -> Option<String> {
        let name = name.trim();
        if name.is_empty() {
            return None;
        }

        let base = self.config.base_url.trim_end_matches('/');
        if name.ends_with(ext) {
            Some(format!("{base}/{dir}/{name}"))
        } else {
            Some(format!("{base}/{dir}/{name}{ext}"))
        }
    }
}

impl AssetResolver for TemplateResolver {
    fn background_url(&self, name: &str) -> Option<String> {
        self.template(&self.config.background_dir, name, &self.config.image_ext)
    }

    fn bgm_url(&self, name: &str) -> Option<String> {
        self.template(&self.config.bgm_dir, name, &self.config.audio_ext)
    }

    fn se_url(&self, name: &str) -> Option<String> {
        self.template(&self.config.se_dir, name, &self.config.audio_ext)
    }

    fn portrait_url(&self, icon: &str) -> Option<String> {
        if is_absolute(icon) {
            return Some(icon.to_string());
        }
        self.template(&self.config.portrait_dir, icon, &self.config.image_ext)
    }
}

fn is_absolute(url: &str) -> bool {
    url.contains("://") || url.starts_with('/')
}
