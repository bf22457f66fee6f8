//! Level database - parsing and storage

use bevy::prelude::*;
use std::fs;

use crate::constants::*;

/// Static box platform, centered at (x, y)
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlatformDef {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl PlatformDef {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    pub fn half_extents(&self) -> Vec2 {
        Vec2::new(self.width, self.height) * 0.5
    }

    pub fn top(&self) -> f32 {
        self.y + self.height * 0.5
    }

    /// One point per whole unit along the top surface
    pub fn walk_anchors(&self) -> Vec<Vec2> {
        let left = (self.x - self.width * 0.5).ceil() as i32;
        let right = (self.x + self.width * 0.5).floor() as i32;
        (left..=right)
            .map(|x| Vec2::new(x as f32, self.top()))
            .collect()
    }
}

/// Single level definition
#[derive(Clone, Debug, PartialEq)]
pub struct LevelData {
    pub name: String,
    pub grid_width: usize,
    pub grid_height: usize,
    /// Falls back to the tuning gravity when unset
    pub gravity: Option<f32>,
    pub platforms: Vec<PlatformDef>,
    pub player_spawn: Vec2,
    pub enemy_spawns: Vec<Vec2>,
}

impl LevelData {
    fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
            grid_width: VIEWPORT_WIDTH as usize,
            grid_height: (VIEWPORT_HEIGHT.ceil()) as usize,
            gravity: None,
            platforms: Vec::new(),
            player_spawn: Vec2::new(VIEWPORT_WIDTH / 2.0, 3.0),
            enemy_spawns: Vec::new(),
        }
    }

    /// Grid anchors for every platform top
    pub fn walk_anchors(&self) -> Vec<Vec2> {
        self.platforms.iter().flat_map(|p| p.walk_anchors()).collect()
    }

    fn floor() -> PlatformDef {
        PlatformDef::new(4.0, 0.5, 8.0, 1.0)
    }

    /// Floor plus three floating platforms, two enemies
    pub fn arena() -> Self {
        Self {
            platforms: vec![
                Self::floor(),
                PlatformDef::new(2.0, 2.0, 2.0, 0.3),
                PlatformDef::new(6.0, 2.0, 2.0, 0.3),
                PlatformDef::new(4.0, 3.0, 2.0, 0.3),
            ],
            player_spawn: Vec2::new(4.0, 3.5),
            enemy_spawns: vec![Vec2::new(5.0, 1.25), Vec2::new(6.5, 2.4)],
            ..Self::named("Arena")
        }
    }

    /// Enemy stranded on a platform with no walkable link to the floor
    pub fn split() -> Self {
        Self {
            platforms: vec![Self::floor(), PlatformDef::new(6.0, 2.0, 2.0, 0.3)],
            player_spawn: Vec2::new(1.5, 1.25),
            enemy_spawns: vec![Vec2::new(6.0, 2.4)],
            ..Self::named("Split")
        }
    }

    /// Flat floor with one enemy already in reach
    pub fn duel() -> Self {
        Self {
            platforms: vec![Self::floor()],
            player_spawn: Vec2::new(2.0, 1.25),
            enemy_spawns: vec![Vec2::new(2.8, 1.25)],
            ..Self::named("Duel")
        }
    }

    /// Flat floor, no enemies
    pub fn training() -> Self {
        Self {
            platforms: vec![Self::floor()],
            player_spawn: Vec2::new(2.0, 1.25),
            ..Self::named("Training")
        }
    }
}

/// Database of all loaded levels
#[derive(Resource, Default, Debug, Clone)]
pub struct LevelDatabase {
    pub levels: Vec<LevelData>,
}

impl LevelDatabase {
    /// Load levels from file, returns default hardcoded levels on error
    pub fn load_from_file(path: &str) -> Self {
        match fs::read_to_string(path) {
            Ok(content) => Self::parse(&content),
            Err(e) => {
                warn!("Failed to load levels from {}: {}, using defaults", path, e);
                Self::default_levels()
            }
        }
    }

    /// Parse level data from string
    pub fn parse(content: &str) -> Self {
        let mut levels = Vec::new();
        let mut current_level: Option<LevelData> = None;

        for line in content.lines() {
            let line = line.trim();

            // Skip empty lines and comments
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            if let Some(name) = line.strip_prefix("level:") {
                if let Some(level) = current_level.take() {
                    levels.push(level);
                }
                current_level = Some(LevelData::named(name.trim()));
                continue;
            }

            let Some(level) = &mut current_level else {
                continue;
            };

            if let Some(params) = line.strip_prefix("grid:") {
                let parts: Vec<&str> = params.split_whitespace().collect();
                if parts.len() >= 2 {
                    if let (Ok(w), Ok(h)) = (parts[0].parse::<usize>(), parts[1].parse::<usize>()) {
                        level.grid_width = w;
                        level.grid_height = h;
                    }
                }
            } else if let Some(value) = line.strip_prefix("gravity:") {
                if let Ok(gravity) = value.trim().parse::<f32>() {
                    level.gravity = Some(gravity);
                }
            } else if let Some(params) = line.strip_prefix("platform:") {
                if let Some([x, y, w, h]) = parse_floats::<4>(params) {
                    if w > 0.0 && h > 0.0 {
                        level.platforms.push(PlatformDef::new(x, y, w, h));
                    }
                }
            } else if let Some(params) = line.strip_prefix("player:") {
                if let Some([x, y]) = parse_floats::<2>(params) {
                    level.player_spawn = Vec2::new(x, y);
                }
            } else if let Some(params) = line.strip_prefix("enemy:") {
                if let Some([x, y]) = parse_floats::<2>(params) {
                    level.enemy_spawns.push(Vec2::new(x, y));
                }
            }
        }

        // Don't forget the last level
        if let Some(level) = current_level {
            levels.push(level);
        }

        if levels.is_empty() {
            warn!("No levels parsed, using defaults");
            return Self::default_levels();
        }

        info!("Loaded {} levels from file", levels.len());
        Self { levels }
    }

    /// Hardcoded fallback levels
    pub fn default_levels() -> Self {
        Self {
            levels: vec![
                LevelData::arena(),
                LevelData::split(),
                LevelData::duel(),
                LevelData::training(),
            ],
        }
    }

    /// Get level by index
    pub fn get(&self, index: usize) -> Option<&LevelData> {
        self.levels.get(index)
    }

    /// Look up by index, then by name (case-insensitive)
    pub fn find(&self, key: &str) -> Option<&LevelData> {
        if let Ok(index) = key.parse::<usize>() {
            return self.get(index);
        }
        self.levels
            .iter()
            .find(|l| l.name.eq_ignore_ascii_case(key.trim()))
    }

    /// Get number of levels
    pub fn len(&self) -> usize {
        self.levels.len()
    }

    /// Check if database is empty
    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }
}

fn parse_floats<const N: usize>(params: &str) -> Option<[f32; N]> {
    let parts: Vec<&str> = params.split_whitespace().collect();
    if parts.len() < N {
        return None;
    }
    let mut values = [0.0; N];
    for (value, part) in values.iter_mut().zip(parts) {
        *value = part.parse().ok()?;
    }
    Some(values)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_level() {
        let db = LevelDatabase::parse(
            "# comment\n\
             level: Cave\n\
             grid: 10 6\n\
             gravity: -2.5\n\
             platform: 5.0 0.5 10.0 1.0\n\
             platform: 2 2 bad 0.3\n\
             player: 1.0 1.25\n\
             enemy: 8.0 1.25\n\
             enemy: 9.0 1.25\n\
             wobble: 3\n",
        );
        assert_eq!(db.len(), 1);
        let level = db.get(0).unwrap();
        assert_eq!(level.name, "Cave");
        assert_eq!((level.grid_width, level.grid_height), (10, 6));
        assert_eq!(level.gravity, Some(-2.5));
        assert_eq!(level.platforms, vec![PlatformDef::new(5.0, 0.5, 10.0, 1.0)]);
        assert_eq!(level.player_spawn, Vec2::new(1.0, 1.25));
        assert_eq!(level.enemy_spawns.len(), 2);
    }

    #[test]
    fn test_shipped_levels_match_builtin() {
        let shipped = LevelDatabase::parse(include_str!("../../config/levels.txt"));
        assert_eq!(shipped.levels, LevelDatabase::default_levels().levels);
    }

    #[test]
    fn test_lines_before_first_level_ignored() {
        let db = LevelDatabase::parse("platform: 1 1 1 1\nlevel: A\nlevel: B\n");
        assert_eq!(db.len(), 2);
        assert!(db.get(0).unwrap().platforms.is_empty());
    }

    #[test]
    fn test_empty_content_falls_back() {
        let db = LevelDatabase::parse("# nothing here\n");
        assert_eq!(db.len(), LevelDatabase::default_levels().len());
        assert!(db.find("arena").is_some());
    }

    #[test]
    fn test_missing_file_falls_back() {
        let db = LevelDatabase::load_from_file("config/no_such_levels.txt");
        assert_eq!(db.get(0).map(|l| l.name.as_str()), Some("Arena"));
    }

    #[test]
    fn test_find_by_index_or_name() {
        let db = LevelDatabase::default_levels();
        assert_eq!(db.find("1").map(|l| l.name.as_str()), Some("Split"));
        assert_eq!(db.find("DUEL").map(|l| l.name.as_str()), Some("Duel"));
        assert!(db.find("Moon").is_none());
        assert!(db.find("99").is_none());
    }

    #[test]
    fn test_walk_anchors_cover_top_surface() {
        let platform = PlatformDef::new(2.0, 2.0, 2.0, 0.3);
        let anchors = platform.walk_anchors();
        let xs: Vec<f32> = anchors.iter().map(|a| a.x).collect();
        assert_eq!(xs, vec![1.0, 2.0, 3.0]);
        assert!(anchors.iter().all(|a| (a.y - 2.15).abs() < 1e-5));
        assert_eq!(LevelData::floor().walk_anchors().len(), 9);
    }
}
