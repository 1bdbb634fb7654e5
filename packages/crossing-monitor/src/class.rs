//! Traffic classes competing for the crossing
//!
//! Three disjoint classes sit on a ring. Each class has exactly two rivals,
//! its ring neighbours, spelled out as a table in [`TrafficClass::rivals`].

use crate::errors::{MonitorError, Result};
use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

/// Traffic class identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrafficClass {
    /// Vehicles heading north (index 0)
    Northbound,
    /// Vehicles heading south (index 1)
    Southbound,
    /// Pedestrians (index 2)
    Pedestrian,
}

impl TrafficClass {
    /// All classes in index order
    pub const ALL: [TrafficClass; 3] = [
        TrafficClass::Northbound,
        TrafficClass::Southbound,
        TrafficClass::Pedestrian,
    ];

    /// Number of classes on the ring
    pub const COUNT: usize = 3;

    pub fn index(&self) -> usize {
        match self {
            TrafficClass::Northbound => 0,
            TrafficClass::Southbound => 1,
            TrafficClass::Pedestrian => 2,
        }
    }

    pub fn from_index(index: usize) -> Result<Self> {
        match index {
            0 => Ok(TrafficClass::Northbound),
            1 => Ok(TrafficClass::Southbound),
            2 => Ok(TrafficClass::Pedestrian),
            _ => Err(MonitorError::InvalidClass(index)),
        }
    }

    /// The two ring neighbours, `(d+1) mod 3` and `(d-1) mod 3`
    pub fn rivals(&self) -> [TrafficClass; 2] {
        match self {
            TrafficClass::Northbound => [TrafficClass::Southbound, TrafficClass::Pedestrian],
            TrafficClass::Southbound => [TrafficClass::Pedestrian, TrafficClass::Northbound],
            TrafficClass::Pedestrian => [TrafficClass::Northbound, TrafficClass::Southbound],
        }
    }

    pub fn is_rival_of(&self, other: TrafficClass) -> bool {
        self.rivals().contains(&other)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TrafficClass::Northbound => "northbound",
            TrafficClass::Southbound => "southbound",
            TrafficClass::Pedestrian => "pedestrian",
        }
    }

    pub fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "northbound" | "north" => Ok(TrafficClass::Northbound),
            "southbound" | "south" => Ok(TrafficClass::Southbound),
            "pedestrian" | "pedestrians" => Ok(TrafficClass::Pedestrian),
            _ => Err(MonitorError::UnknownClass(s.to_string())),
        }
    }
}

impl std::fmt::Display for TrafficClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One value per traffic class, indexed by [`TrafficClass`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PerClass<T>([T; TrafficClass::COUNT]);

impl<T> PerClass<T> {
    pub fn new(northbound: T, southbound: T, pedestrian: T) -> Self {
        Self([northbound, southbound, pedestrian])
    }

    pub fn from_fn(mut f: impl FnMut(TrafficClass) -> T) -> Self {
        Self([
            f(TrafficClass::Northbound),
            f(TrafficClass::Southbound),
            f(TrafficClass::Pedestrian),
        ])
    }

    /// Iterate `(class, value)` pairs in index order
    pub fn iter(&self) -> impl Iterator<Item = (TrafficClass, &T)> {
        TrafficClass::ALL.into_iter().zip(self.0.iter())
    }

    pub fn map<U>(&self, mut f: impl FnMut(TrafficClass, &T) -> U) -> PerClass<U> {
        PerClass::from_fn(|class| f(class, &self[class]))
    }
}

impl<T: Clone> PerClass<T> {
    pub fn splat(value: T) -> Self {
        Self([value.clone(), value.clone(), value])
    }
}

impl<T> Index<TrafficClass> for PerClass<T> {
    type Output = T;

    fn index(&self, class: TrafficClass) -> &T {
        &self.0[class.index()]
    }
}

impl<T> IndexMut<TrafficClass> for PerClass<T> {
    fn index_mut(&mut self, class: TrafficClass) -> &mut T {
        &mut self.0[class.index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_class_index_roundtrip() {
        for class in TrafficClass::ALL {
            assert_eq!(TrafficClass::from_index(class.index()).unwrap(), class);
        }
        assert_eq!(
            TrafficClass::from_index(3).unwrap_err(),
            MonitorError::InvalidClass(3)
        );
    }

    #[test]
    fn test_rivals_match_ring_neighbours() {
        for class in TrafficClass::ALL {
            let d = class.index();
            let expected = [
                TrafficClass::from_index((d + 1) % 3).unwrap(),
                TrafficClass::from_index((d + 2) % 3).unwrap(),
            ];
            assert_eq!(class.rivals(), expected);
            assert!(!class.is_rival_of(class));
        }
    }

    #[test]
    fn test_class_from_str_aliases() {
        assert_eq!(TrafficClass::from_str("North").unwrap(), TrafficClass::Northbound);
        assert_eq!(TrafficClass::from_str("southbound").unwrap(), TrafficClass::Southbound);
        assert_eq!(TrafficClass::from_str("pedestrians").unwrap(), TrafficClass::Pedestrian);
        assert!(TrafficClass::from_str("bikes").is_err());
    }

    #[test]
    fn test_per_class_indexing() {
        let mut counts = PerClass::splat(0u32);
        counts[TrafficClass::Southbound] += 2;
        assert_eq!(counts[TrafficClass::Southbound], 2);
        assert_eq!(counts[TrafficClass::Northbound], 0);

        let names: Vec<_> = counts.iter().map(|(c, _)| c.as_str()).collect();
        assert_eq!(names, vec!["northbound", "southbound", "pedestrian"]);
    }
}
