use crate::payload::Ingredient;

/// Check state of a recipe's ingredients, every row checked initially.
#[derive(Clone, Debug, PartialEq)]
pub struct IngredientChecklist {
    rows: Vec<(Ingredient, bool)>,
}

impl IngredientChecklist {
    /// Creates a checklist with every ingredient checked.
    pub fn new(ingredients: &[Ingredient]) -> Self {
        let rows = ingredients.iter().cloned().map(|i| (i, true)).collect();
        Self { rows }
    }

    /// Returns the rows together with their check state.
    #[inline]
    pub fn rows(&self) -> &[(Ingredient, bool)] {
        &self.rows
    }

    /// Sets the check state of a row. Out of range indices are ignored and
    /// `false` is returned.
    pub fn set(&mut self, index: usize, checked: bool) -> bool {
        let Some(row) = self.rows.get_mut(index) else {
            return false;
        };
        row.1 = checked;
        true
    }

    /// Flips the check state of a row.
    pub fn toggle(&mut self, index: usize) -> bool {
        let Some(row) = self.rows.get_mut(index) else {
            return false;
        };
        row.1 = !row.1;
        true
    }

    /// Returns the checked ingredients in list order.
    pub fn selected(&self) -> Vec<Ingredient> {
        self.rows
            .iter()
            .filter(|(_, checked)| *checked)
            .map(|(ingredient, _)| ingredient.clone())
            .collect()
    }
}
