use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum League {
    J1,
    J2,
    J3,
}

pub const ALL_LEAGUES: [League; 3] = [League::J1, League::J2, League::J3];

impl League {
    pub fn key(self) -> &'static str {
        match self {
            League::J1 => "J1",
            League::J2 => "J2",
            League::J3 => "J3",
        }
    }

    pub fn file_name(self) -> &'static str {
        match self {
            League::J1 => "2025_J1_physical_data.csv",
            League::J2 => "2025_J2_physical_data.csv",
            League::J3 => "2025_J3_physical_data.csv",
        }
    }

    pub fn data_path(self, data_dir: &Path) -> PathBuf {
        data_dir.join(self.file_name())
    }

    pub fn next(self) -> League {
        match self {
            League::J1 => League::J2,
            League::J2 => League::J3,
            League::J3 => League::J1,
        }
    }

    pub fn parse(raw: &str) -> Option<League> {
        let s = raw.trim().to_ascii_uppercase();
        let s = s.strip_prefix("J.").map(|rest| format!("J{rest}")).unwrap_or(s);
        ALL_LEAGUES.iter().copied().find(|l| l.key() == s)
    }
}

pub fn league_label(league: League) -> &'static str {
    match league {
        League::J1 => "J1 League",
        League::J2 => "J2 League",
        League::J3 => "J3 League",
    }
}
