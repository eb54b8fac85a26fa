//! Shared test fixtures for integration tests.

#![allow(dead_code)]

use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use prosumer_synth::config::BuildConfig;

static NEXT_DIR: AtomicUsize = AtomicUsize::new(0);

/// Ticks per day used by every fixture series.
pub const TICKS_PER_DAY: usize = 48;

/// A throwaway data folder populated with CSV inputs, removed on drop.
pub struct DataDir {
    path: PathBuf,
}

impl DataDir {
    /// Creates an empty folder unique to this process and call.
    pub fn empty(name: &str) -> Self {
        let n = NEXT_DIR.fetch_add(1, Ordering::SeqCst);
        let path = std::env::temp_dir().join(format!(
            "prosumer-synth-{}-{name}-{n}",
            std::process::id()
        ));
        let _ = fs::remove_dir_all(&path);
        fs::create_dir_all(&path).expect("temp data dir should be creatable");
        Self { path }
    }

    /// Creates a folder with two days of well-formed inputs.
    pub fn standard(name: &str) -> Self {
        let dir = Self::empty(name);
        dir.write_weather(2 * TICKS_PER_DAY);
        dir.write_system_demand(2 * TICKS_PER_DAY);
        dir.write_household_profiles(2 * TICKS_PER_DAY, 3);
        dir.write_defra_categories(&[(1, 0.2), (2, 0.5), (3, 0.3)]);
        dir.write_defra_profiles(TICKS_PER_DAY, &[1, 2, 3]);
        dir
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn write(&self, file: &str, contents: &str) {
        fs::write(self.path.join(file), contents).expect("fixture file should be writable");
    }

    pub fn write_weather(&self, rows: usize) {
        let mut s = String::from("insolation,windSpeed,airTemp\n");
        for t in 0..rows {
            let hour = (t % TICKS_PER_DAY) as f32 / 2.0;
            let insolation = if (6.0..18.0).contains(&hour) { 400.0 } else { 0.0 };
            let _ = writeln!(s, "{insolation},{:.1},{:.1}", 4.0 + (t % 7) as f32, 8.0 + hour / 4.0);
        }
        self.write("weather.csv", &s);
    }

    pub fn write_system_demand(&self, rows: usize) {
        let mut s = String::from("demand\n");
        for t in 0..rows {
            let _ = writeln!(s, "{:.2}", 30.0 + (t % TICKS_PER_DAY) as f32);
        }
        self.write("system_demand.csv", &s);
    }

    /// Household attribute file with `profiles` columns named `demand0..`.
    pub fn write_household_profiles(&self, rows: usize, profiles: usize) {
        let mut s = String::from("tick");
        for p in 0..profiles {
            let _ = write!(s, ",demand{p}");
        }
        s.push('\n');
        for t in 0..rows {
            let _ = write!(s, "{t}");
            for p in 0..profiles {
                let _ = write!(s, ",{:.3}", 0.1 * (p + 1) as f32);
            }
            s.push('\n');
        }
        self.write("household_demand.csv", &s);
    }

    pub fn write_defra_categories(&self, categories: &[(u8, f32)]) {
        let mut s = String::from("category,proportion\n");
        for (c, p) in categories {
            let _ = writeln!(s, "{c},{p}");
        }
        self.write("defra_categories.csv", &s);
    }

    pub fn write_defra_profiles(&self, rows: usize, categories: &[u8]) {
        let header: Vec<String> = categories.iter().map(|c| format!("profile{c}")).collect();
        let mut s = header.join(",");
        s.push('\n');
        for _ in 0..rows {
            let row: Vec<String> = categories.iter().map(|c| format!("{:.2}", f32::from(*c) / 10.0)).collect();
            s.push_str(&row.join(","));
            s.push('\n');
        }
        self.write("defra_profiles.csv", &s);
    }
}

impl Drop for DataDir {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.path);
    }
}

/// Baseline config pointed at `dir`, with a fixed seed and household count.
pub fn config_for(dir: &DataDir, households: u32, seed: u64) -> BuildConfig {
    let mut cfg = BuildConfig::baseline();
    cfg.run.data_file_folder = dir.path().to_path_buf();
    cfg.run.default_prosumers_per_feeder = households;
    cfg.run.ticks_per_day = TICKS_PER_DAY;
    cfg.run.seed = Some(seed);
    cfg
}
