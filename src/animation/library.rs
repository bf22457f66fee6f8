//! Animation library - sheets and clips parsed from the manifest
//!
//! ```text
//! sheet: cat_idle sprites/player/Cat_Idle.png 64 32 8 1
//! clip: player_idle cat_idle 0 8 0.1
//! ```

use std::collections::HashMap;
use std::fs;

use bevy::prelude::*;

use super::clip::{AnimationClip, ClipId};

/// One sprite sheet: an image split into a fixed grid of tiles
#[derive(Debug, Clone, PartialEq)]
pub struct SheetDef {
    pub name: String,
    pub path: String,
    pub tile_width: u32,
    pub tile_height: u32,
    pub columns: u32,
    pub rows: u32,
}

impl SheetDef {
    pub fn frame_count(&self) -> usize {
        (self.columns * self.rows) as usize
    }
}

#[derive(Resource, Debug, Clone, Default)]
pub struct AnimationLibrary {
    sheets: Vec<SheetDef>,
    clips: HashMap<ClipId, AnimationClip>,
}

impl AnimationLibrary {
    /// Load from the manifest file; an empty library on error
    pub fn load_from_file(path: &str) -> Self {
        match fs::read_to_string(path) {
            Ok(content) => {
                let library = Self::parse(&content);
                info!(
                    "Loaded {} sheets and {} clips from {}",
                    library.sheets.len(),
                    library.clips.len(),
                    path
                );
                library
            }
            Err(e) => {
                warn!("Failed to load animations from {}: {}", path, e);
                Self::default()
            }
        }
    }

    /// Parse manifest content. Bad lines are logged and skipped.
    pub fn parse(content: &str) -> Self {
        let mut library = Self::default();

        for (line_no, line) in content.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let result = if let Some(params) = line.strip_prefix("sheet:") {
                library.parse_sheet(params)
            } else if let Some(params) = line.strip_prefix("clip:") {
                library.parse_clip(params)
            } else {
                Err(format!("unknown directive '{}'", line))
            };

            if let Err(err) = result {
                warn!("animations line {}: {}", line_no + 1, err);
            }
        }

        library
    }

    fn parse_sheet(&mut self, params: &str) -> Result<(), String> {
        let parts: Vec<&str> = params.split_whitespace().collect();
        if parts.len() < 6 {
            return Err(format!("sheet needs 6 fields, got {}", parts.len()));
        }
        let number = |s: &str| {
            s.parse::<u32>()
                .map_err(|e| format!("bad number '{}': {}", s, e))
        };
        let sheet = SheetDef {
            name: parts[0].to_string(),
            path: parts[1].to_string(),
            tile_width: number(parts[2])?,
            tile_height: number(parts[3])?,
            columns: number(parts[4])?,
            rows: number(parts[5])?,
        };
        if sheet.frame_count() == 0 {
            return Err(format!("sheet '{}' has no frames", sheet.name));
        }
        if self.sheets.iter().any(|s| s.name == sheet.name) {
            return Err(format!("duplicate sheet '{}'", sheet.name));
        }
        self.sheets.push(sheet);
        Ok(())
    }

    fn parse_clip(&mut self, params: &str) -> Result<(), String> {
        let parts: Vec<&str> = params.split_whitespace().collect();
        if parts.len() < 5 {
            return Err(format!("clip needs 5 fields, got {}", parts.len()));
        }
        let id = ClipId::from_name(parts[0]).ok_or_else(|| format!("unknown clip '{}'", parts[0]))?;
        let sheet = self
            .sheet_index(parts[1])
            .ok_or_else(|| format!("clip '{}' uses unknown sheet '{}'", parts[0], parts[1]))?;
        let first_frame: usize = parts[2]
            .parse()
            .map_err(|e| format!("bad first frame '{}': {}", parts[2], e))?;
        let frame_count: usize = parts[3]
            .parse()
            .map_err(|e| format!("bad frame count '{}': {}", parts[3], e))?;
        let frame_duration: f32 = parts[4]
            .parse()
            .map_err(|e| format!("bad frame duration '{}': {}", parts[4], e))?;

        if frame_count == 0 || frame_duration <= 0.0 {
            return Err(format!("clip '{}' is empty", parts[0]));
        }
        if first_frame + frame_count > self.sheets[sheet].frame_count() {
            return Err(format!(
                "clip '{}' runs past the end of sheet '{}'",
                parts[0], parts[1]
            ));
        }

        self.clips.insert(
            id,
            AnimationClip {
                sheet,
                first_frame,
                frame_count,
                frame_duration,
            },
        );
        Ok(())
    }

    pub fn sheet_index(&self, name: &str) -> Option<usize> {
        self.sheets.iter().position(|s| s.name == name)
    }

    pub fn sheets(&self) -> &[SheetDef] {
        &self.sheets
    }

    pub fn clip(&self, id: ClipId) -> Option<&AnimationClip> {
        self.clips.get(&id)
    }

    pub fn clip_count(&self) -> usize {
        self.clips.len()
    }

    /// Clip ids with no definition, for a one-time load report
    pub fn missing_clips(&self) -> Vec<ClipId> {
        ClipId::ALL
            .into_iter()
            .filter(|id| !self.clips.contains_key(id))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MANIFEST: &str = "\
# player
sheet: cat_light sprites/player/Cat_LightAttack.png 64 32 10 1
sheet: cat_idle sprites/player/Cat_Idle.png 64 32 8 1
clip: player_light_1 cat_light 0 6 0.08
clip: player_light_2 cat_light 6 4 0.08
clip: player_idle cat_idle 0 8 0.1
";

    #[test]
    fn test_parse_manifest() {
        let library = AnimationLibrary::parse(MANIFEST);
        assert_eq!(library.sheets().len(), 2);
        assert_eq!(library.clip_count(), 3);

        let second = library.clip(ClipId::PlayerLight2).unwrap();
        assert_eq!(second.sheet, 0);
        assert_eq!(second.first_frame, 6);
        assert_eq!(second.sheet_index(1.0, false), 9);
        assert_eq!(library.sheets()[1].path, "sprites/player/Cat_Idle.png");
    }

    #[test]
    fn test_bad_lines_skipped() {
        let content = format!(
            "{}\n\
             clip: player_run cat_missing 0 10 0.1\n\
             clip: player_jump cat_idle 6 4 0.1\n\
             clip: player_fall cat_idle 0 0 0.1\n\
             clip: cat_nap cat_idle 0 1 0.1\n\
             sheet: broken path.png 64\n\
             sheet: cat_idle other.png 64 32 1 1\n\
             animate: everything\n",
            MANIFEST
        );
        let library = AnimationLibrary::parse(&content);
        assert_eq!(library.sheets().len(), 2);
        assert_eq!(library.clip_count(), 3);
        assert!(library.clip(ClipId::PlayerRun).is_none());
        assert!(library.clip(ClipId::PlayerJump).is_none());
        assert!(library.clip(ClipId::PlayerFall).is_none());
        assert!(library.missing_clips().contains(&ClipId::EnemyDeath));
    }

    #[test]
    fn test_missing_manifest_is_empty() {
        let library = AnimationLibrary::load_from_file("assets/no_such_manifest.txt");
        assert_eq!(library.clip_count(), 0);
        assert_eq!(library.missing_clips().len(), ClipId::ALL.len());
    }
}
