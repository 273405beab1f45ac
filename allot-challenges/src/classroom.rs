use crate::{check_range, parse_fields, read_rows, write_rows};
use anyhow::{anyhow, Result};
use rand::{rngs::SmallRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use serde_json::{from_value, Map, Value};
use std::path::Path;

fn default_min_students() -> u32 {
    10
}
fn default_max_students() -> u32 {
    90
}
fn default_min_capacity() -> u32 {
    30
}
fn default_max_capacity() -> u32 {
    90
}
fn default_min_distance() -> u32 {
    1
}
fn default_max_distance() -> u32 {
    10
}

#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq)]
pub struct Difficulty {
    pub num_disciplines: usize,
    pub num_rooms: usize,
    #[serde(default = "default_min_students")]
    pub min_students: u32,
    #[serde(default = "default_max_students")]
    pub max_students: u32,
    #[serde(default = "default_min_capacity")]
    pub min_capacity: u32,
    #[serde(default = "default_max_capacity")]
    pub max_capacity: u32,
    #[serde(default = "default_min_distance")]
    pub min_distance: u32,
    /// Exclusive upper bound.
    #[serde(default = "default_max_distance")]
    pub max_distance: u32,
}

impl Difficulty {
    pub fn new(num_disciplines: usize, num_rooms: usize) -> Self {
        Self {
            num_disciplines,
            num_rooms,
            min_students: default_min_students(),
            max_students: default_max_students(),
            min_capacity: default_min_capacity(),
            max_capacity: default_max_capacity(),
            min_distance: default_min_distance(),
            max_distance: default_max_distance(),
        }
    }

    pub fn instance_name(&self, seed: u64) -> String {
        format!(
            "D{}_S{}_[{},{}]_[{},{}]_[{},{}]_seed{}",
            self.num_disciplines,
            self.num_rooms,
            self.min_students,
            self.max_students,
            self.min_capacity,
            self.max_capacity,
            self.min_distance,
            self.max_distance,
            seed
        )
    }

    pub fn file_name(&self, seed: u64) -> String {
        format!("classroom_{}.csv", self.instance_name(seed))
    }
}

impl From<Vec<usize>> for Difficulty {
    fn from(arr: Vec<usize>) -> Self {
        let num_disciplines = arr.first().copied().unwrap_or(0);
        Self::new(num_disciplines, arr.get(1).copied().unwrap_or(num_disciplines))
    }
}

/// Room index chosen for each discipline.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Solution {
    pub assignment: Vec<usize>,
}

impl TryFrom<Map<String, Value>> for Solution {
    type Error = serde_json::Error;

    fn try_from(v: Map<String, Value>) -> Result<Self, Self::Error> {
        from_value(Value::Object(v))
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Challenge {
    pub disciplines: Vec<String>,
    pub rooms: Vec<String>,
    pub students: Vec<u32>,
    pub capacities: Vec<u32>,
    pub distances: Vec<Vec<u32>>,
}

impl Challenge {
    pub fn new(
        disciplines: Vec<String>,
        rooms: Vec<String>,
        students: Vec<u32>,
        capacities: Vec<u32>,
        distances: Vec<Vec<u32>>,
    ) -> Result<Self> {
        if students.len() != disciplines.len() {
            return Err(anyhow!(
                "Got {} enrolments for {} disciplines",
                students.len(),
                disciplines.len()
            ));
        }
        if capacities.len() != rooms.len() {
            return Err(anyhow!(
                "Got {} capacities for {} rooms",
                capacities.len(),
                rooms.len()
            ));
        }
        if distances.len() != disciplines.len() {
            return Err(anyhow!(
                "Distance matrix has {} rows, expected {}",
                distances.len(),
                disciplines.len()
            ));
        }
        if let Some((i, row)) = distances
            .iter()
            .enumerate()
            .find(|(_, row)| row.len() != rooms.len())
        {
            return Err(anyhow!(
                "Distance row {} has {} entries, expected {}",
                i,
                row.len(),
                rooms.len()
            ));
        }
        Ok(Self {
            disciplines,
            rooms,
            students,
            capacities,
            distances,
        })
    }

    pub fn generate_instance(seed: u64, difficulty: &Difficulty) -> Result<Self> {
        if difficulty.num_disciplines == 0 || difficulty.num_rooms == 0 {
            return Err(anyhow!("Instance needs at least one discipline and one room"));
        }
        if difficulty.num_disciplines > difficulty.num_rooms {
            return Err(anyhow!(
                "Number of disciplines ({}) must not exceed number of rooms ({})",
                difficulty.num_disciplines,
                difficulty.num_rooms
            ));
        }
        check_range("students", difficulty.min_students, difficulty.max_students)?;
        check_range("capacity", difficulty.min_capacity, difficulty.max_capacity)?;
        if difficulty.min_distance >= difficulty.max_distance {
            return Err(anyhow!(
                "Invalid distance range [{}, {})",
                difficulty.min_distance,
                difficulty.max_distance
            ));
        }

        let mut rng = SmallRng::seed_from_u64(seed);

        let capacities: Vec<u32> = (0..difficulty.num_rooms)
            .map(|_| rng.gen_range(difficulty.min_capacity..=difficulty.max_capacity))
            .collect();

        // each discipline fits at least the room it was drawn against
        let mut students = Vec::with_capacity(difficulty.num_disciplines);
        for i in 0..difficulty.num_disciplines {
            let room = rng.gen_range(0..difficulty.num_rooms);
            let capacity = capacities[room];
            if difficulty.min_students > capacity {
                return Err(anyhow!(
                    "Discipline {} drew room {} with capacity {} below min_students ({})",
                    i,
                    room,
                    capacity,
                    difficulty.min_students
                ));
            }
            students.push(rng.gen_range(difficulty.min_students..=capacity));
        }

        let distances: Vec<Vec<u32>> = (0..difficulty.num_disciplines)
            .map(|_| {
                (0..difficulty.num_rooms)
                    .map(|_| rng.gen_range(difficulty.min_distance..difficulty.max_distance))
                    .collect()
            })
            .collect();

        Ok(Self {
            disciplines: (1..=difficulty.num_disciplines)
                .map(|i| format!("D{}", i))
                .collect(),
            rooms: (1..=difficulty.num_rooms).map(|j| format!("S{}", j)).collect(),
            students,
            capacities,
            distances,
        })
    }

    pub fn num_disciplines(&self) -> usize {
        self.disciplines.len()
    }

    pub fn num_rooms(&self) -> usize {
        self.rooms.len()
    }

    pub fn fits(&self, discipline: usize, room: usize) -> bool {
        self.students[discipline] <= self.capacities[room]
    }

    /// Students times distance for placing `discipline` in `room`.
    pub fn cost(&self, discipline: usize, room: usize) -> u64 {
        self.students[discipline] as u64 * self.distances[discipline][room] as u64
    }

    fn check_assignment_shape(&self, solution: &Solution) -> Result<()> {
        if solution.assignment.len() != self.num_disciplines() {
            return Err(anyhow!(
                "Assignment has {} entries, expected {}",
                solution.assignment.len(),
                self.num_disciplines()
            ));
        }
        if let Some((i, &room)) = solution
            .assignment
            .iter()
            .enumerate()
            .find(|(_, room)| **room >= self.num_rooms())
        {
            return Err(anyhow!(
                "Discipline {} assigned to room {} which is out of bounds",
                i,
                room
            ));
        }
        Ok(())
    }

    /// Every discipline in its own room, and every room large enough.
    pub fn verify_solution(&self, solution: &Solution) -> Result<()> {
        self.check_assignment_shape(solution)?;
        let mut owner: Vec<Option<usize>> = vec![None; self.num_rooms()];
        for (i, &room) in solution.assignment.iter().enumerate() {
            if let Some(other) = owner[room] {
                return Err(anyhow!(
                    "Room {} hosts both discipline {} and discipline {}",
                    self.rooms[room],
                    self.disciplines[other],
                    self.disciplines[i]
                ));
            }
            owner[room] = Some(i);
            if !self.fits(i, room) {
                return Err(anyhow!(
                    "Discipline {} has {} students but room {} only seats {}",
                    self.disciplines[i],
                    self.students[i],
                    self.rooms[room],
                    self.capacities[room]
                ));
            }
        }
        Ok(())
    }

    /// Rooms may host several disciplines while their summed enrolment fits.
    pub fn verify_shared_capacity(&self, solution: &Solution) -> Result<()> {
        self.check_assignment_shape(solution)?;
        let mut load = vec![0u64; self.num_rooms()];
        for (i, &room) in solution.assignment.iter().enumerate() {
            load[room] += self.students[i] as u64;
        }
        for (room, &l) in load.iter().enumerate() {
            if l > self.capacities[room] as u64 {
                return Err(anyhow!(
                    "Room {} hosts {} students but only seats {}",
                    self.rooms[room],
                    l,
                    self.capacities[room]
                ));
            }
        }
        Ok(())
    }

    pub fn evaluate_total_cost(&self, solution: &Solution) -> Result<u64> {
        self.check_assignment_shape(solution)?;
        Ok(solution
            .assignment
            .iter()
            .enumerate()
            .map(|(i, &room)| self.cost(i, room))
            .sum())
    }

    pub fn write_csv<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let mut rows: Vec<Vec<String>> = Vec::with_capacity(4 + self.num_disciplines());
        rows.push(self.disciplines.clone());
        rows.push(self.rooms.clone());
        rows.push(self.students.iter().map(u32::to_string).collect());
        rows.push(self.capacities.iter().map(u32::to_string).collect());
        for row in &self.distances {
            rows.push(row.iter().map(u32::to_string).collect());
        }
        write_rows(path.as_ref(), &rows)
    }

    pub fn read_csv<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let rows = read_rows(path)?;
        if rows.len() < 4 {
            return Err(anyhow!(
                "{}: expected at least 4 rows, found {}",
                path.display(),
                rows.len()
            ));
        }
        let disciplines: Vec<String> = rows[0].iter().filter(|f| !f.is_empty()).cloned().collect();
        let rooms: Vec<String> = rows[1].iter().filter(|f| !f.is_empty()).cloned().collect();
        let n = disciplines.len();
        let m = rooms.len();
        if rows.len().checked_sub(4) != Some(n) {
            return Err(anyhow!(
                "{}: expected 4 header rows and {} distance rows, found {} rows",
                path.display(),
                n,
                rows.len()
            ));
        }
        let students = parse_fields::<u32>(&rows, 2, n, "enrolments")?;
        let capacities = parse_fields::<u32>(&rows, 3, m, "capacities")?;
        let distances = (0..n)
            .map(|i| parse_fields::<u32>(&rows, 4 + i, m, "distances"))
            .collect::<Result<Vec<_>>>()?;
        Self::new(disciplines, rooms, students, capacities, distances)
    }
}
