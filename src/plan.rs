//! Training plan builder: the ordered list of exercises with custom minutes
//! that becomes a [`Training`].

use itertools::Itertools;

use crate::catalog::{Catalog, Exercise, Training, TrainingExercise};
use crate::error::CatalogError;

/// Minutes added when an exercise already in the plan is added again
pub const REPEAT_EXTRA_MINUTES: u32 = 5;
pub const MIN_MINUTES: u32 = 1;

/// Validated plan contents, ready to be stored as a training
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrainingDraft {
    pub name: String,
    pub categories: Vec<String>,
    pub exercises: Vec<TrainingExercise>,
    pub total_minutes: u32,
    pub observations: String,
}

/// Minutes spent on one category within a training
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryShare {
    pub category_id: String,
    pub name: String,
    pub minutes: u32,
    pub percent: f64,
}

/// Exercises whose category is selected; an empty selection keeps all
pub fn filter_exercises<'a>(exercises: &'a [Exercise], selected: &[String]) -> Vec<&'a Exercise> {
    exercises
        .iter()
        .filter(|e| selected.is_empty() || selected.contains(&e.category_id))
        .collect()
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlanBuilder {
    items: Vec<TrainingExercise>,
}

impl PlanBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts from an existing training, for editing
    pub fn from_training(training: &Training) -> Self {
        let mut items = training.exercises.clone();
        items.sort_by_key(|item| item.order);
        let mut builder = Self { items };
        builder.renumber();
        builder
    }

    pub fn items(&self) -> &[TrainingExercise] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn total_minutes(&self) -> u32 {
        self.items.iter().map(|item| item.custom_minutes).sum()
    }

    pub fn add(&mut self, exercise: &Exercise) {
        if let Some(item) = self
            .items
            .iter_mut()
            .find(|item| item.exercise_id == exercise.id)
        {
            item.custom_minutes += REPEAT_EXTRA_MINUTES;
            return;
        }

        self.items.push(TrainingExercise {
            exercise_id: exercise.id.clone(),
            custom_minutes: exercise.estimated_minutes.max(MIN_MINUTES),
            order: self.items.len() + 1,
        });
    }

    pub fn remove(&mut self, exercise_id: &str) -> bool {
        let before = self.items.len();
        self.items.retain(|item| item.exercise_id != exercise_id);
        self.renumber();
        self.items.len() != before
    }

    /// Adds `delta` minutes (negative to subtract), never going below one
    pub fn adjust_minutes(&mut self, exercise_id: &str, delta: i32) -> bool {
        match self
            .items
            .iter_mut()
            .find(|item| item.exercise_id == exercise_id)
        {
            Some(item) => {
                let adjusted = (item.custom_minutes as i64 + delta as i64).max(MIN_MINUTES as i64);
                item.custom_minutes = u32::try_from(adjusted).unwrap_or(u32::MAX);
                true
            }
            None => false,
        }
    }

    pub fn move_up(&mut self, index: usize) -> bool {
        if index == 0 || index >= self.items.len() {
            return false;
        }
        self.items.swap(index - 1, index);
        self.renumber();
        true
    }

    pub fn move_down(&mut self, index: usize) -> bool {
        if index + 1 >= self.items.len() {
            return false;
        }
        self.items.swap(index, index + 1);
        self.renumber();
        true
    }

    /// Drag-and-drop: takes the item at `from` out and inserts it at `to`
    pub fn move_item(&mut self, from: usize, to: usize) -> bool {
        if from == to || from >= self.items.len() || to >= self.items.len() {
            return false;
        }
        let item = self.items.remove(from);
        self.items.insert(to, item);
        self.renumber();
        true
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn build(
        &self,
        name: &str,
        categories: Vec<String>,
        observations: &str,
    ) -> Result<TrainingDraft, CatalogError> {
        if self.items.is_empty() {
            return Err(CatalogError::EmptyPlan);
        }
        let name = name.trim();
        if name.is_empty() {
            return Err(CatalogError::MissingName);
        }

        Ok(TrainingDraft {
            name: name.to_string(),
            categories,
            exercises: self.items.clone(),
            total_minutes: self.total_minutes(),
            observations: observations.to_string(),
        })
    }

    fn renumber(&mut self) {
        for (idx, item) in self.items.iter_mut().enumerate() {
            item.order = idx + 1;
        }
    }
}

/// Minutes per category in first-seen order, with their share of the
/// training's declared total. Exercises missing from the catalog are skipped.
pub fn category_breakdown(training: &Training, catalog: &Catalog) -> Vec<CategoryShare> {
    let grouped = training
        .exercises
        .iter()
        .filter_map(|entry| {
            let exercise = catalog.exercise(&entry.exercise_id)?;
            let category = catalog.category(&exercise.category_id)?;
            Some((category, entry.custom_minutes))
        })
        .into_group_map_by(|(category, _)| category.id.clone());

    let order: Vec<&str> = training
        .exercises
        .iter()
        .filter_map(|entry| catalog.exercise(&entry.exercise_id))
        .map(|exercise| exercise.category_id.as_str())
        .unique()
        .collect();

    order
        .into_iter()
        .filter_map(|id| {
            let entries = grouped.get(id)?;
            let minutes: u32 = entries.iter().map(|(_, m)| m).sum();
            let percent = if training.total_minutes > 0 {
                minutes as f64 / training.total_minutes as f64 * 100.0
            } else {
                0.0
            };
            Some(CategoryShare {
                category_id: id.to_string(),
                name: entries[0].0.name.clone(),
                minutes,
                percent,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn catalog() -> Catalog {
        Catalog::seeded().unwrap()
    }

    fn ids(builder: &PlanBuilder) -> Vec<&str> {
        builder
            .items()
            .iter()
            .map(|i| i.exercise_id.as_str())
            .collect()
    }

    fn orders(builder: &PlanBuilder) -> Vec<usize> {
        builder.items().iter().map(|i| i.order).collect()
    }

    fn builder_with(ids: &[&str]) -> PlanBuilder {
        let catalog = catalog();
        let mut builder = PlanBuilder::new();
        for id in ids {
            builder.add(catalog.exercise(id).unwrap());
        }
        builder
    }

    #[test]
    fn test_filter_exercises() {
        let catalog = catalog();
        assert_eq!(filter_exercises(catalog.exercises(), &[]).len(), 5);

        let warmups = filter_exercises(catalog.exercises(), &["1".to_string()]);
        let names: Vec<&str> = warmups.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["Calentamiento articular", "Estiramientos"]);
    }

    #[test]
    fn test_add_uses_estimated_minutes() {
        let builder = builder_with(&["1", "3"]);
        assert_eq!(ids(&builder), vec!["1", "3"]);
        assert_eq!(orders(&builder), vec![1, 2]);
        assert_eq!(builder.total_minutes(), 35);
    }

    #[test]
    fn test_add_existing_adds_five_minutes() {
        let builder = builder_with(&["2", "2"]);
        assert_eq!(builder.len(), 1);
        assert_eq!(builder.items()[0].custom_minutes, 20);
    }

    #[test]
    fn test_remove_renumbers() {
        let mut builder = builder_with(&["1", "2", "3"]);
        assert!(builder.remove("2"));
        assert_eq!(ids(&builder), vec!["1", "3"]);
        assert_eq!(orders(&builder), vec![1, 2]);
        assert!(!builder.remove("2"));
    }

    #[test]
    fn test_adjust_minutes_floor() {
        let mut builder = builder_with(&["1"]);
        assert!(builder.adjust_minutes("1", 5));
        assert_eq!(builder.total_minutes(), 15);
        assert!(builder.adjust_minutes("1", -100));
        assert_eq!(builder.items()[0].custom_minutes, 1);
        assert!(!builder.adjust_minutes("9", 1));
    }

    #[test]
    fn test_move_up_and_down() {
        let mut builder = builder_with(&["1", "2", "3"]);
        assert!(!builder.move_up(0));
        assert!(builder.move_up(2));
        assert_eq!(ids(&builder), vec!["1", "3", "2"]);
        assert!(!builder.move_down(2));
        assert!(builder.move_down(0));
        assert_eq!(ids(&builder), vec!["3", "1", "2"]);
        assert_eq!(orders(&builder), vec![1, 2, 3]);
    }

    #[test]
    fn test_move_item_drag_and_drop() {
        let mut builder = builder_with(&["1", "2", "3", "4"]);
        assert!(builder.move_item(0, 2));
        assert_eq!(ids(&builder), vec!["2", "3", "1", "4"]);
        assert!(builder.move_item(3, 0));
        assert_eq!(ids(&builder), vec!["4", "2", "3", "1"]);
        assert_eq!(orders(&builder), vec![1, 2, 3, 4]);

        assert!(!builder.move_item(1, 1));
        assert!(!builder.move_item(0, 9));
    }

    #[test]
    fn test_build_validation() {
        let empty = PlanBuilder::new();
        assert_matches!(empty.build("x", vec![], ""), Err(CatalogError::EmptyPlan));

        let builder = builder_with(&["1"]);
        assert_matches!(builder.build("   ", vec![], ""), Err(CatalogError::MissingName));

        let draft = builder
            .build("  Semana 2 ", vec!["1".into()], "hidratación")
            .unwrap();
        assert_eq!(draft.name, "Semana 2");
        assert_eq!(draft.total_minutes, 10);
        assert_eq!(draft.exercises.len(), 1);
    }

    #[test]
    fn test_from_training_sorts_by_order() {
        let mut training = catalog().training("1").unwrap().clone();
        training.exercises.reverse();
        let builder = PlanBuilder::from_training(&training);
        assert_eq!(ids(&builder), vec!["1", "2", "3"]);
        assert_eq!(builder.total_minutes(), 45);
    }

    #[test]
    fn test_category_breakdown() {
        let catalog = catalog();
        let training = catalog.training("1").unwrap();
        let shares = category_breakdown(training, &catalog);

        let names: Vec<&str> = shares.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Calentamiento", "Resistencia", "Fuerza"]);
        assert_eq!(shares[2].minutes, 20);
        assert!((shares[2].percent - 44.44).abs() < 0.01);
    }

    #[test]
    fn test_category_breakdown_merges_same_category() {
        let catalog = catalog();
        let mut training = catalog.training("1").unwrap().clone();
        // warm-up and stretching share a category
        training.exercises = vec![
            TrainingExercise {
                exercise_id: "1".into(),
                custom_minutes: 10,
                order: 1,
            },
            TrainingExercise {
                exercise_id: "5".into(),
                custom_minutes: 10,
                order: 2,
            },
        ];
        training.total_minutes = 20;

        let shares = category_breakdown(&training, &catalog);
        assert_eq!(shares.len(), 1);
        assert_eq!(shares[0].minutes, 20);
        assert_eq!(shares[0].percent, 100.0);
    }
}
