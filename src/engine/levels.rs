//
// Copyright 2025 Jeff Bush
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
//

use crate::scene::{LevelId, SceneId};

pub struct GhostSpawn {
    pub x: i32,
    pub y: i32,
    pub color: &'static str,
}

pub struct LevelInfo {
    pub id: LevelId,
    // Player's top left corner on a fresh start
    pub start: (i32, i32),
    // Where climbing out of the top leads
    pub next: SceneId,
    // The bottom level has no floor exit
    pub is_first: bool,
    pub ghosts: &'static [GhostSpawn],
}

const HIGH_ORANGE: &[GhostSpawn] = &[GhostSpawn {
    x: 500,
    y: 100,
    color: "orange",
}];

const LOW_ORANGE: &[GhostSpawn] = &[GhostSpawn {
    x: 800,
    y: 750,
    color: "orange",
}];

// Indexed by LevelId.
static LEVELS: [LevelInfo; 5] = [
    LevelInfo {
        id: LevelId::One,
        start: (480, 764),
        next: SceneId::Level(LevelId::Two),
        is_first: true,
        ghosts: HIGH_ORANGE,
    },
    LevelInfo {
        id: LevelId::Two,
        start: (100, 614),
        next: SceneId::Level(LevelId::Three),
        is_first: false,
        ghosts: HIGH_ORANGE,
    },
    LevelInfo {
        id: LevelId::Three,
        start: (100, 614),
        next: SceneId::Level(LevelId::Four),
        is_first: false,
        ghosts: HIGH_ORANGE,
    },
    LevelInfo {
        id: LevelId::Four,
        start: (100, 614),
        next: SceneId::Level(LevelId::Five),
        is_first: false,
        ghosts: HIGH_ORANGE,
    },
    LevelInfo {
        id: LevelId::Five,
        start: (50, 764),
        next: SceneId::Victory,
        is_first: false,
        ghosts: LOW_ORANGE,
    },
];

pub fn info(id: LevelId) -> &'static LevelInfo {
    &LEVELS[id as usize]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_is_indexed_by_id() {
        for id in LevelId::ALL {
            assert_eq!(info(id).id, id);
        }
    }

    #[test]
    fn test_graph_climbs_to_victory() {
        let mut visited = Vec::new();
        let mut scene = SceneId::Level(LevelId::One);
        while let SceneId::Level(id) = scene {
            assert!(!visited.contains(&id), "cycle at {:?}", id);
            visited.push(id);
            scene = info(id).next;
        }

        assert_eq!(scene, SceneId::Victory);
        assert_eq!(visited, LevelId::ALL);
    }

    #[test]
    fn test_only_first_level_has_no_floor_exit() {
        let first: Vec<LevelId> = LevelId::ALL
            .into_iter()
            .filter(|&id| info(id).is_first)
            .collect();
        assert_eq!(first, [LevelId::One]);
        assert!(LevelId::ALL.iter().all(|&id| !info(id).ghosts.is_empty()));
    }
}
