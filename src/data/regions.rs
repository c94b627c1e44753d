//! Country bucketing: WHO-style sub-regions and World Bank income tiers.
//!
//! The tables are deliberately static: reporting-name drift across dataset
//! vintages is handled upstream (the names below match the WHO exports this
//! tool is pointed at), and a country outside every bucket simply classifies
//! as `None`.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Geographic sub-region, following WHO reporting groupings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Region {
    WesternEurope,
    EasternEurope,
    NorthernEurope,
    SouthernEurope,
    NorthAmerica,
    CentralAmericaCaribbean,
    SouthAmerica,
    WesternPacific,
    EasternMediterranean,
    SouthEastAsia,
}

impl Region {
    /// Human-readable label for terminal output.
    pub fn display_name(self) -> &'static str {
        match self {
            Region::WesternEurope => "Western Europe",
            Region::EasternEurope => "Eastern Europe",
            Region::NorthernEurope => "Northern Europe",
            Region::SouthernEurope => "Southern Europe",
            Region::NorthAmerica => "North America",
            Region::CentralAmericaCaribbean => "Central America and Caribbean",
            Region::SouthAmerica => "South America",
            Region::WesternPacific => "Western-Pacific",
            Region::EasternMediterranean => "Eastern Mediterranean",
            Region::SouthEastAsia => "South-East Asia",
        }
    }

    fn countries(self) -> &'static [&'static str] {
        match self {
            Region::WesternEurope => &[
                "Austria",
                "Belgium",
                "France",
                "Germany",
                "Ireland",
                "Luxembourg",
                "Netherlands (Kingdom of the)",
                "Switzerland",
                "United Kingdom of Great Britain",
            ],
            Region::EasternEurope => &[
                "Armenia",
                "Azerbaijan",
                "Belarus",
                "Bulgaria",
                "Georgia",
                "Kazakhstan",
                "Kyrgyzstan",
                "Republic of Moldova",
                "Russian Federation",
                "Tajikistan",
                "Turkmenistan",
                "Ukraine",
                "Uzbekistan",
            ],
            Region::NorthernEurope => &[
                "Denmark", "Estonia", "Finland", "Iceland", "Latvia", "Lithuania", "Norway",
                "Sweden",
            ],
            Region::SouthernEurope => &[
                "Albania",
                "Andorra",
                "Bosnia and Herzegovina",
                "Croatia",
                "Cyprus",
                "Greece",
                "Italy",
                "Malta",
                "Monaco",
                "Montenegro",
                "North Macedonia",
                "Portugal",
                "San Marino",
                "Serbia",
                "Slovenia",
                "Spain",
                "Turkey",
            ],
            Region::NorthAmerica => &["Canada", "United States of America"],
            Region::CentralAmericaCaribbean => &[
                "Bahamas",
                "Barbados",
                "Belize",
                "Costa Rica",
                "Cuba",
                "Dominica",
                "Dominican Republic",
                "El Salvador",
                "Grenada",
                "Guatemala",
                "Haiti",
                "Honduras",
                "Jamaica",
                "Mexico",
                "Nicaragua",
                "Panama",
                "Saint Kitts and Nevis",
                "Saint Lucia",
                "Saint Vincent and the Grenadines",
                "Trinidad and Tobago",
            ],
            Region::SouthAmerica => &[
                "Argentina",
                "Bolivia (Plurinational State of)",
                "Brazil",
                "Chile",
                "Colombia",
                "Ecuador",
                "Guyana",
                "Paraguay",
                "Peru",
                "Suriname",
                "Uruguay",
                "Venezuela (Bolivarian Republic of)",
            ],
            Region::WesternPacific => &[
                "Australia",
                "Brunei Darussalam",
                "Cambodia",
                "China",
                "Cook Islands",
                "Fiji",
                "Japan",
                "Kiribati",
                "Lao People's Democratic Republic",
                "Malaysia",
                "Marshall Islands",
                "Micronesia (Federated States of)",
                "Mongolia",
                "Nauru",
                "New Zealand",
                "Niue",
                "Palau",
                "Papua New Guinea",
                "Philippines",
                "Republic of Korea",
                "Samoa",
                "Singapore",
                "Solomon Islands",
                "Tonga",
                "Tuvalu",
                "Vanuatu",
                "Viet Nam",
            ],
            Region::EasternMediterranean => &[
                "Afghanistan",
                "Bahrain",
                "Djibouti",
                "Egypt",
                "Iran (Islamic Republic of)",
                "Iraq",
                "Jordan",
                "Kuwait",
                "Lebanon",
                "Libya",
                "Morocco",
                "occupied Palestinian territory, including east Jerusalem",
                "Oman",
                "Pakistan",
                "Qatar",
                "Saudi Arabia",
                "Somalia",
                "Sudan",
                "Syrian Arab Republic",
                "Tunisia",
                "United Arab Emirates",
                "Yemen",
            ],
            Region::SouthEastAsia => &[
                "Bangladesh",
                "Bhutan",
                "Democratic People's Republic of Korea",
                "India",
                "Indonesia",
                "Maldives",
                "Myanmar",
                "Nepal",
                "Sri Lanka",
                "Thailand",
                "Timor-Leste",
            ],
        }
    }

    pub const ALL: [Region; 10] = [
        Region::WesternEurope,
        Region::EasternEurope,
        Region::NorthernEurope,
        Region::SouthernEurope,
        Region::NorthAmerica,
        Region::CentralAmericaCaribbean,
        Region::SouthAmerica,
        Region::WesternPacific,
        Region::EasternMediterranean,
        Region::SouthEastAsia,
    ];
}

/// World Bank income classification (2024-2025 vintage).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum EconomicTier {
    HighIncome,
    UpperMiddleIncome,
    LowerMiddleIncome,
    LowIncome,
}

impl EconomicTier {
    /// Human-readable label for terminal output.
    pub fn display_name(self) -> &'static str {
        match self {
            EconomicTier::HighIncome => "High Income",
            EconomicTier::UpperMiddleIncome => "Upper-Middle Income",
            EconomicTier::LowerMiddleIncome => "Lower-Middle Income",
            EconomicTier::LowIncome => "Low Income",
        }
    }

    fn countries(self) -> &'static [&'static str] {
        match self {
            EconomicTier::HighIncome => &[
                "United States of America",
                "Russian Federation",
                "Croatia",
                "Uruguay",
                "Panama",
                "Malaysia",
                "Oman",
                "Qatar",
                "Saudi Arabia",
                "United Arab Emirates",
                "Trinidad and Tobago",
                "Argentina",
                "Barbados",
            ],
            EconomicTier::UpperMiddleIncome => &[
                "China",
                "Turkey",
                "Belarus",
                "Bosnia and Herzegovina",
                "Montenegro",
                "North Macedonia",
                "Serbia",
                "Kazakhstan",
                "Brazil",
                "Colombia",
                "Costa Rica",
                "Cuba",
                "Dominican Republic",
                "Ecuador",
                "Mexico",
                "Peru",
                "Thailand",
                "Fiji",
                "Iran (Islamic Republic of)",
                "Iraq",
                "Jordan",
                "Lebanon",
                "Albania",
                "Armenia",
                "Azerbaijan",
                "Georgia",
            ],
            EconomicTier::LowerMiddleIncome => &[
                "Ukraine",
                "Republic of Moldova",
                "Belize",
                "Bolivia (Plurinational State of)",
                "El Salvador",
                "Guatemala",
                "Honduras",
                "Nicaragua",
                "Paraguay",
                "Jamaica",
                "Egypt",
                "Morocco",
                "Tunisia",
                "Philippines",
                "Vietnam",
                "Indonesia",
                "India",
                "Bhutan",
                "Sri Lanka",
                "Djibouti",
                "Pakistan",
                "Kyrgyzstan",
                "Mongolia",
                "Cambodia",
                "Lao People's Democratic Republic",
            ],
            EconomicTier::LowIncome => &[
                "Afghanistan",
                "Bangladesh",
                "Myanmar",
                "Nepal",
                "Syrian Arab Republic",
                "Yemen",
                "Somalia",
                "Sudan",
            ],
        }
    }

    pub const ALL: [EconomicTier; 4] = [
        EconomicTier::HighIncome,
        EconomicTier::UpperMiddleIncome,
        EconomicTier::LowerMiddleIncome,
        EconomicTier::LowIncome,
    ];
}

/// Classify a country name into a sub-region.
pub fn region_of(country: &str) -> Option<Region> {
    let name = country.trim();
    Region::ALL
        .into_iter()
        .find(|region| region.countries().contains(&name))
}

/// Classify a country name into an income tier.
pub fn tier_of(country: &str) -> Option<EconomicTier> {
    let name = country.trim();
    EconomicTier::ALL
        .into_iter()
        .find(|tier| tier.countries().contains(&name))
}
