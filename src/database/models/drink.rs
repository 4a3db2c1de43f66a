use serde::{Deserialize, Serialize};

/// One line of a recipe
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ingredient {
    pub name: String,
    pub color: String,
    pub parts: i64,
}

/// Ingredient as shown on the public menu: no name
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShortIngredient {
    pub color: String,
    pub parts: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Drink {
    pub id: i64,
    pub title: String,
    pub recipe: Vec<Ingredient>,
}

/// Public projection of a drink
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShortDrink {
    pub id: i64,
    pub title: String,
    pub recipe: Vec<ShortIngredient>,
}

/// Full projection of a drink
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LongDrink {
    pub id: i64,
    pub title: String,
    pub recipe: Vec<Ingredient>,
}

impl Drink {
    pub fn short(&self) -> ShortDrink {
        ShortDrink {
            id: self.id,
            title: self.title.clone(),
            recipe: self
                .recipe
                .iter()
                .map(|i| ShortIngredient {
                    color: i.color.clone(),
                    parts: i.parts,
                })
                .collect(),
        }
    }

    pub fn long(&self) -> LongDrink {
        LongDrink {
            id: self.id,
            title: self.title.clone(),
            recipe: self.recipe.clone(),
        }
    }

    /// Replace whichever fields the patch carries
    pub fn apply(&mut self, patch: DrinkPatch) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(recipe) = patch.recipe {
            self.recipe = recipe;
        }
    }
}

/// A drink before the store has assigned its id
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewDrink {
    pub title: String,
    pub recipe: Vec<Ingredient>,
}

impl NewDrink {
    /// The drink a freshly initialised store starts with
    pub fn seed() -> Self {
        Self {
            title: "water".to_string(),
            recipe: vec![Ingredient {
                name: "water".to_string(),
                color: "blue".to_string(),
                parts: 1,
            }],
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DrinkPatch {
    pub title: Option<String>,
    pub recipe: Option<Vec<Ingredient>>,
}

/// Request-side recipe: clients send either a list or a single ingredient
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RecipeInput {
    Many(Vec<Ingredient>),
    One(Ingredient),
}

impl From<RecipeInput> for Vec<Ingredient> {
    fn from(input: RecipeInput) -> Self {
        match input {
            RecipeInput::Many(list) => list,
            RecipeInput::One(single) => vec![single],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn latte() -> Drink {
        Drink {
            id: 7,
            title: "Latte".into(),
            recipe: vec![
                Ingredient { name: "espresso".into(), color: "brown".into(), parts: 1 },
                Ingredient { name: "milk".into(), color: "white".into(), parts: 3 },
            ],
        }
    }

    #[test]
    fn short_view_omits_ingredient_names() {
        let value = serde_json::to_value(latte().short()).unwrap();
        assert_eq!(
            value,
            json!({
                "id": 7,
                "title": "Latte",
                "recipe": [
                    { "color": "brown", "parts": 1 },
                    { "color": "white", "parts": 3 }
                ]
            })
        );
    }

    #[test]
    fn long_view_keeps_names() {
        let value = serde_json::to_value(latte().long()).unwrap();
        assert_eq!(value["recipe"][1]["name"], json!("milk"));
        assert_eq!(value["id"], json!(7));
    }

    #[test]
    fn title_only_patch_keeps_recipe() {
        let mut drink = latte();
        drink.apply(DrinkPatch { title: Some("Flat White".into()), recipe: None });
        assert_eq!(drink.title, "Flat White");
        assert_eq!(drink.recipe, latte().recipe);
        assert_eq!(drink.id, 7);
    }

    #[test]
    fn single_ingredient_recipe_becomes_list() {
        let input: RecipeInput =
            serde_json::from_value(json!({ "name": "water", "color": "blue", "parts": 1 })).unwrap();
        let recipe: Vec<Ingredient> = input.into();
        assert_eq!(recipe, NewDrink::seed().recipe);
    }
}
