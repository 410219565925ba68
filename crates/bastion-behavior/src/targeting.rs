//! Target acquisition: nearest candidate within a radius.

use glam::Vec3;

/// Nearest candidate within `radius` of `origin`, considering only the first
/// `capacity` candidates inside the radius. Ties keep the first encountered.
///
/// Returns the candidate and its distance.
pub fn find_nearest<T, I>(origin: Vec3, radius: f32, capacity: usize, candidates: I) -> Option<(T, f32)>
where
    T: Copy,
    I: IntoIterator<Item = (T, Vec3)>,
{
    let mut best: Option<(T, f32)> = None;
    for (id, distance) in candidates
        .into_iter()
        .map(|(id, position)| (id, origin.distance(position)))
        .filter(|&(_, distance)| distance <= radius)
        .take(capacity)
    {
        if best.map_or(true, |(_, best_distance)| distance < best_distance) {
            best = Some((id, distance));
        }
    }
    best
}

/// Searches for a target while the holder has none and reports each
/// acquisition exactly once.
#[derive(Debug, Clone)]
pub struct TargetFinder {
    pub radius: f32,
    pub capacity: usize,
    announced: bool,
}

impl TargetFinder {
    pub fn new(radius: f32, capacity: usize) -> Self {
        Self {
            radius,
            capacity,
            announced: false,
        }
    }

    /// Search with `candidates` if `target` is empty, then report the target
    /// if it has not been reported yet. `candidates` is only called when a
    /// search runs.
    pub fn acquire<T, I, F>(&mut self, origin: Vec3, target: &mut Option<T>, candidates: F) -> Option<T>
    where
        T: Copy,
        I: IntoIterator<Item = (T, Vec3)>,
        F: FnOnce() -> I,
    {
        if target.is_none() {
            self.announced = false;
            *target = find_nearest(origin, self.radius, self.capacity, candidates()).map(|(id, _)| id);
        }
        match *target {
            Some(found) if !self.announced => {
                self.announced = true;
                Some(found)
            }
            _ => None,
        }
    }

    /// Whether the current target has been reported.
    pub fn has_announced(&self) -> bool {
        self.announced
    }

    pub fn reset(&mut self) {
        self.announced = false;
    }
}
