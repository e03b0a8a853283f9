//! The navigable destinations of the app that search ranks over.

use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::LazyLock;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub id: String,
    pub title: String,
    pub description: String,
    pub category: String,
    pub url: String,
}

impl CatalogEntry {
    pub fn new(id: &str, title: &str, description: &str, category: &str, url: &str) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
            description: description.to_string(),
            category: category.to_string(),
            url: url.to_string(),
        }
    }
}

static BUILTIN_CATALOG: LazyLock<Vec<CatalogEntry>> = LazyLock::new(|| {
    vec![
        CatalogEntry::new(
            "dashboard",
            "Dashboard",
            "Overview of balances, recent transactions and quick actions",
            "pages",
            "/dashboard",
        ),
        CatalogEntry::new(
            "virtual-cards",
            "Virtual Cards",
            "Create, fund and freeze virtual dollar cards",
            "cards",
            "/cards",
        ),
        CatalogEntry::new(
            "create-card",
            "Create Virtual Card",
            "Issue a new virtual card for online payments",
            "cards",
            "/cards/new",
        ),
        CatalogEntry::new(
            "currency-converter",
            "Currency Converter",
            "Convert between fiat currencies at today's rates",
            "tools",
            "/converter",
        ),
        CatalogEntry::new(
            "crypto-portfolio",
            "Crypto Portfolio",
            "Track your cryptocurrency holdings and performance",
            "crypto",
            "/crypto",
        ),
        CatalogEntry::new(
            "crypto-trading",
            "Buy & Sell Crypto",
            "Trade Bitcoin, Ethereum and other crypto assets",
            "crypto",
            "/crypto/trade",
        ),
        CatalogEntry::new(
            "airtime-to-cash",
            "Airtime to Cash",
            "Turn excess phone credit into cash in your wallet",
            "services",
            "/airtime",
        ),
        CatalogEntry::new(
            "transactions",
            "Transaction History",
            "Search and filter all wallet and card transactions",
            "pages",
            "/transactions",
        ),
        CatalogEntry::new(
            "referrals",
            "Referrals",
            "Invite friends and earn rewards for every signup",
            "rewards",
            "/referrals",
        ),
        CatalogEntry::new(
            "notifications",
            "Notification Settings",
            "Choose email, SMS and push alerts for account activity",
            "settings",
            "/settings/notifications",
        ),
        CatalogEntry::new(
            "profile",
            "Profile Settings",
            "Update personal details and verification documents",
            "settings",
            "/settings/profile",
        ),
        CatalogEntry::new(
            "security",
            "Security",
            "Manage password, two-factor authentication and devices",
            "settings",
            "/settings/security",
        ),
        CatalogEntry::new(
            "support",
            "Help & Support",
            "FAQs and ways to reach the support team",
            "pages",
            "/support",
        ),
    ]
});

pub fn builtin_catalog() -> &'static [CatalogEntry] {
    &BUILTIN_CATALOG
}

/// Built-in destinations followed by any configured extras.
#[derive(Debug, Clone)]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
}

impl Catalog {
    pub fn builtin() -> Self {
        Self {
            entries: builtin_catalog().to_vec(),
        }
    }

    /// Appends `extra` after the built-in entries. Ids must stay unique.
    pub fn with_extra(extra: &[CatalogEntry]) -> Result<Self> {
        let mut entries = builtin_catalog().to_vec();
        entries.extend_from_slice(extra);
        Self::from_entries(entries)
    }

    pub fn from_entries(entries: Vec<CatalogEntry>) -> Result<Self> {
        let mut seen = HashSet::new();
        for entry in &entries {
            if entry.id.is_empty() {
                bail!("Catalog entry '{}' has an empty id", entry.title);
            }
            if !seen.insert(entry.id.as_str()) {
                bail!("Duplicate catalog entry id: {}", entry.id);
            }
        }
        debug!("Catalog has {} entries", entries.len());
        Ok(Self { entries })
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    /// Distinct categories in the order they first appear.
    pub fn categories(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.entries
            .iter()
            .map(|e| e.category.as_str())
            .filter(|c| seen.insert(*c))
            .collect()
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}
