//! Module for describing, generating and storing TSP instances.
//!
//! An instance names its cities, the home city, the cities to visit and the
//! directed cost matrix between them. Instances are stored as JSON; the
//! cost matrix may be omitted from a file when city coordinates are given,
//! in which case Euclidean distances are used.

use crate::error::{Result, TspError};
use crate::matrix::CostMatrix;
use crate::solution::Solution;
use crate::solver::Algorithm;
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

/// A named city with 2D coordinates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct City {
    pub name: String,
    pub x: f64,
    pub y: f64,
}

impl City {
    pub fn new(name: impl Into<String>, x: f64, y: f64) -> Self {
        City { name: name.into(), x, y }
    }

    /// Euclidean distance to another city
    pub fn distance_to(&self, other: &City) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

impl std::fmt::Display for City {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "City {} ({}, {})", self.name, self.x, self.y)
    }
}

/// How costs are produced for a generated instance
#[derive(Copy, Clone, PartialEq, Debug, Serialize, Deserialize)]
pub enum CostModel {
    /// Straight-line distance between city coordinates
    Euclidean,
    /// Independent integer cost in `min..=max` for every ordered pair
    Uniform { min: u32, max: u32 },
}

impl Default for CostModel {
    fn default() -> Self {
        CostModel::Uniform { min: 50, max: 100 }
    }
}

/// Parameters for [`Instance::random`]
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    /// Total number of cities, home included
    pub num_cities: usize,
    /// Number of cities to visit besides home
    pub num_stops: usize,
    /// Coordinates are integers in `0..=coordinate_range`
    pub coordinate_range: u32,
    pub cost_model: CostModel,
    pub seed: u64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        GeneratorConfig {
            num_cities: 10,
            num_stops: 4,
            coordinate_range: 100,
            cost_model: CostModel::default(),
            seed: 42,
        }
    }
}

/// A complete TSP instance
#[derive(Debug, Clone)]
pub struct Instance {
    pub name: String,
    /// Start and end of every route
    pub home: String,
    /// Cities to visit, home excluded
    pub visit: Vec<String>,
    /// Coordinates, empty when the instance only has costs
    pub cities: Vec<City>,
    pub matrix: CostMatrix<String>,
}

/// On-disk layout of an instance
#[derive(Debug, Serialize, Deserialize)]
struct InstanceFile {
    name: String,
    home: String,
    visit: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    cities: Vec<City>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    costs: Option<CostTable>,
}

#[derive(Debug, Serialize, Deserialize)]
struct CostTable {
    labels: Vec<String>,
    rows: Vec<Vec<f64>>,
}

/// Spreadsheet-style name for the `i`-th city: A..Z, AA..AZ, BA...
pub fn city_name(mut i: usize) -> String {
    let mut name = Vec::new();
    loop {
        name.push(b'A' + (i % 26) as u8);
        if i < 26 {
            break;
        }
        i = i / 26 - 1;
    }
    name.reverse();
    String::from_utf8(name).unwrap_or_default()
}

impl Instance {
    /// Build an instance, checking that home and every stop have costs
    pub fn new(
        name: impl Into<String>,
        home: impl Into<String>,
        visit: Vec<String>,
        cities: Vec<City>,
        matrix: CostMatrix<String>,
    ) -> Result<Self> {
        let instance = Instance {
            name: name.into(),
            home: home.into(),
            visit,
            cities,
            matrix,
        };
        instance.validate()?;
        Ok(instance)
    }

    /// Build an instance with Euclidean costs between `cities`
    pub fn from_cities(
        name: impl Into<String>,
        home: impl Into<String>,
        visit: Vec<String>,
        cities: Vec<City>,
    ) -> Result<Self> {
        let matrix = Self::euclidean_matrix(&cities)?;
        Self::new(name, home, visit, cities, matrix)
    }

    fn euclidean_matrix(cities: &[City]) -> Result<CostMatrix<String>> {
        let labels: Vec<String> = cities.iter().map(|c| c.name.clone()).collect();
        let rows = cities
            .iter()
            .map(|from| cities.iter().map(|to| from.distance_to(to)).collect())
            .collect();
        CostMatrix::new(labels, rows)
    }

    fn validate(&self) -> Result<()> {
        if !self.matrix.contains(&self.home) {
            return Err(TspError::InvalidInstance(format!(
                "home city {} has no costs",
                self.home
            )));
        }
        if let Some(missing) = self.visit.iter().find(|c| !self.matrix.contains(c)) {
            return Err(TspError::InvalidInstance(format!(
                "city {} has no costs",
                missing
            )));
        }
        if let Some(city) = self.cities.iter().find(|c| !self.matrix.contains(&c.name)) {
            return Err(TspError::InvalidInstance(format!(
                "city {} has coordinates but no costs",
                city.name
            )));
        }
        Ok(())
    }

    /// Generate a random instance.
    ///
    /// Cities are named A, B, C... and placed on integer coordinates. The home
    /// city and the stops are drawn at random from them.
    pub fn random(config: &GeneratorConfig) -> Result<Self> {
        if config.num_cities == 0 || config.num_stops >= config.num_cities {
            return Err(TspError::InvalidInstance(format!(
                "cannot pick {} stops besides home among {} cities",
                config.num_stops, config.num_cities
            )));
        }

        let mut rng = ChaCha8Rng::seed_from_u64(config.seed);

        let cities: Vec<City> = (0..config.num_cities)
            .map(|i| {
                let x = rng.gen_range(0..=config.coordinate_range) as f64;
                let y = rng.gen_range(0..=config.coordinate_range) as f64;
                City::new(city_name(i), x, y)
            })
            .collect();

        let matrix = match config.cost_model {
            CostModel::Euclidean => Self::euclidean_matrix(&cities)?,
            CostModel::Uniform { min, max } => {
                if min > max {
                    return Err(TspError::InvalidInstance(format!(
                        "empty cost range {}..={}",
                        min, max
                    )));
                }
                let labels: Vec<String> = cities.iter().map(|c| c.name.clone()).collect();
                CostMatrix::from_fn(labels, |_, _| rng.gen_range(min..=max) as f64)?
            }
        };

        let home_idx = rng.gen_range(0..cities.len());
        let home = cities[home_idx].name.clone();
        let others: Vec<&City> = cities.iter().filter(|c| c.name != home).collect();
        let visit: Vec<String> = others
            .choose_multiple(&mut rng, config.num_stops)
            .map(|c| c.name.clone())
            .collect();

        let name = format!("random-{}-{}-{}", config.num_cities, config.num_stops, config.seed);
        Self::new(name, home, visit, cities, matrix)
    }

    /// Load an instance from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let reader = BufReader::new(File::open(&path)?);
        let file: InstanceFile = serde_json::from_reader(reader)?;
        Self::from_instance_file(file)
    }

    /// Parse an instance from a JSON string
    pub fn from_json(json: &str) -> Result<Self> {
        Self::from_instance_file(serde_json::from_str(json)?)
    }

    fn from_instance_file(file: InstanceFile) -> Result<Self> {
        let matrix = match file.costs {
            Some(table) => CostMatrix::new(table.labels, table.rows)?,
            None if !file.cities.is_empty() => Self::euclidean_matrix(&file.cities)?,
            None => {
                return Err(TspError::InvalidInstance(
                    "either costs or cities must be given".to_string(),
                ))
            }
        };
        Self::new(file.name, file.home, file.visit, file.cities, matrix)
    }

    fn to_instance_file(&self) -> InstanceFile {
        let labels = self.matrix.labels().to_vec();
        let n = labels.len();
        let rows = (0..n)
            .map(|i| (0..n).map(|j| self.matrix.cost_at(i, j)).collect())
            .collect();

        InstanceFile {
            name: self.name.clone(),
            home: self.home.clone(),
            visit: self.visit.clone(),
            cities: self.cities.clone(),
            costs: Some(CostTable { labels, rows }),
        }
    }

    /// Save the instance as pretty-printed JSON
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(writer, &self.to_instance_file())?;
        Ok(())
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.to_instance_file())?)
    }

    /// Number of cities to visit besides home
    pub fn num_stops(&self) -> usize {
        self.visit.len()
    }

    pub fn city(&self, name: &str) -> Option<&City> {
        self.cities.iter().find(|c| c.name == name)
    }

    /// Solve with `algorithm`, without size checks
    pub fn solve(&self, algorithm: Algorithm) -> Result<Solution<String>> {
        algorithm.solve(&self.matrix, &self.home, &self.visit)
    }

    /// Get statistics about the instance
    pub fn statistics(&self) -> InstanceStatistics {
        let costs: Vec<f64> = self.matrix.off_diagonal().collect();
        let avg_cost = if costs.is_empty() {
            0.0
        } else {
            costs.iter().sum::<f64>() / costs.len() as f64
        };
        let min_cost = costs.iter().cloned().fold(f64::INFINITY, f64::min);
        let max_cost = costs.iter().cloned().fold(0.0, f64::max);

        InstanceStatistics {
            name: self.name.clone(),
            num_cities: self.matrix.len(),
            num_stops: self.visit.len(),
            home: self.home.clone(),
            symmetric: self.matrix.is_symmetric(),
            has_coordinates: !self.cities.is_empty(),
            avg_cost,
            min_cost: if costs.is_empty() { 0.0 } else { min_cost },
            max_cost,
        }
    }
}

/// Statistics about a TSP instance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstanceStatistics {
    pub name: String,
    pub num_cities: usize,
    pub num_stops: usize,
    pub home: String,
    pub symmetric: bool,
    pub has_coordinates: bool,
    pub avg_cost: f64,
    pub min_cost: f64,
    pub max_cost: f64,
}

impl std::fmt::Display for InstanceStatistics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Instance: {}", self.name)?;
        writeln!(f, "  Cities: {} (home {}, {} to visit)", self.num_cities, self.home, self.num_stops)?;
        writeln!(f, "  Symmetric costs: {}", self.symmetric)?;
        writeln!(f, "  Coordinates: {}", self.has_coordinates)?;
        writeln!(f, "  Avg cost: {:.2}", self.avg_cost)?;
        writeln!(f, "  Min cost: {:.2}", self.min_cost)?;
        writeln!(f, "  Max cost: {:.2}", self.max_cost)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> Vec<City> {
        vec![
            City::new("A", 0.0, 0.0),
            City::new("B", 3.0, 0.0),
            City::new("C", 3.0, 4.0),
            City::new("D", 0.0, 4.0),
        ]
    }

    #[test]
    fn test_distance_calculation() {
        let a = City::new("A", 0.0, 0.0);
        let b = City::new("B", 3.0, 4.0);

        assert!((a.distance_to(&b) - 5.0).abs() < 1e-10);
        assert!((b.distance_to(&a) - 5.0).abs() < 1e-10);
        assert_eq!(a.to_string(), "City A (0, 0)");
    }

    #[test]
    fn test_city_names() {
        assert_eq!(city_name(0), "A");
        assert_eq!(city_name(9), "J");
        assert_eq!(city_name(25), "Z");
        assert_eq!(city_name(26), "AA");
        assert_eq!(city_name(27), "AB");
        assert_eq!(city_name(52), "BA");
    }

    #[test]
    fn test_from_cities() {
        let visit = vec!["B".to_string(), "C".to_string(), "D".to_string()];
        let instance = Instance::from_cities("square", "A", visit, square()).unwrap();

        assert_eq!(instance.matrix.cost(&"A".to_string(), &"C".to_string()), Some(5.0));
        let solution = instance.solve(Algorithm::DynamicProgramming).unwrap();
        assert!((solution.cost - 14.0).abs() < 1e-9);
        assert!(instance.statistics().symmetric);
        assert_eq!(instance.matrix.cost(&"D".to_string(), &"D".to_string()), Some(0.0));
    }

    #[test]
    fn test_from_cities_rejects_duplicate_names() {
        let mut cities = square();
        cities.push(City::new("B", 9.0, 9.0));
        let result = Instance::from_cities("twice", "A", vec!["C".to_string()], cities);
        assert!(matches!(result, Err(TspError::DuplicateLocation(_))));
    }

    #[test]
    fn test_unknown_home_is_rejected() {
        let result = Instance::from_cities("bad", "Q", vec!["A".to_string()], square());
        assert!(matches!(result, Err(TspError::InvalidInstance(_))));
    }

    #[test]
    fn test_random_is_reproducible() {
        let config = GeneratorConfig::default();
        let first = Instance::random(&config).unwrap();
        let second = Instance::random(&config).unwrap();

        assert_eq!(first.home, second.home);
        assert_eq!(first.visit, second.visit);
        assert_eq!(first.matrix, second.matrix);
        assert_eq!(first.matrix.len(), 10);
        assert_eq!(first.visit.len(), 4);
        assert!(!first.visit.contains(&first.home));

        for cost in first.matrix.off_diagonal() {
            assert!((50.0..=100.0).contains(&cost));
        }
    }

    #[test]
    fn test_random_rejects_too_many_stops() {
        let config = GeneratorConfig {
            num_cities: 3,
            num_stops: 3,
            ..Default::default()
        };
        assert!(Instance::random(&config).is_err());
    }

    #[test]
    fn test_json_round_trip() {
        let config = GeneratorConfig {
            cost_model: CostModel::Euclidean,
            ..Default::default()
        };
        let instance = Instance::random(&config).unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("instance.json");
        instance.to_file(&path).unwrap();
        let loaded = Instance::from_file(&path).unwrap();

        assert_eq!(loaded.name, instance.name);
        assert_eq!(loaded.home, instance.home);
        assert_eq!(loaded.visit, instance.visit);
        assert_eq!(loaded.cities, instance.cities);
        assert_eq!(loaded.matrix, instance.matrix);
    }

    #[test]
    fn test_json_with_coordinates_only() {
        let json = r#"{
            "name": "coords",
            "home": "A",
            "visit": ["B", "C"],
            "cities": [
                {"name": "A", "x": 0.0, "y": 0.0},
                {"name": "B", "x": 3.0, "y": 0.0},
                {"name": "C", "x": 3.0, "y": 4.0}
            ]
        }"#;
        let instance = Instance::from_json(json).unwrap();
        let solution = instance.solve(Algorithm::BruteForce).unwrap();

        assert!((solution.cost - 12.0).abs() < 1e-9);
        assert!(Instance::from_json(r#"{"name": "x", "home": "A", "visit": []}"#).is_err());
    }
}
