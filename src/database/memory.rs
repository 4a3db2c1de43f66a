use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::manager::DatabaseError;
use super::models::drink::{Drink, NewDrink};
use super::store::DrinkStore;

#[derive(Debug, Default)]
struct Inner {
    drinks: BTreeMap<i64, Drink>,
    last_id: i64,
}

impl Inner {
    fn push(&mut self, drink: NewDrink) -> Drink {
        self.last_id += 1;

        let drink = Drink {
            id: self.last_id,
            title: drink.title,
            recipe: drink.recipe,
        };
        self.drinks.insert(drink.id, drink.clone());
        drink
    }
}

/// Process-local drink store. Ids count up from 1 and are never handed out twice,
/// including across `reset`.
#[derive(Debug, Default)]
pub struct MemoryDrinkStore {
    inner: RwLock<Inner>,
}

impl MemoryDrinkStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with the given drinks, in order
    pub fn with_drinks(drinks: impl IntoIterator<Item = NewDrink>) -> Self {
        let mut inner = Inner::default();
        for drink in drinks {
            inner.push(drink);
        }
        Self {
            inner: RwLock::new(inner),
        }
    }
}

#[async_trait]
impl DrinkStore for MemoryDrinkStore {
    async fn list(&self) -> Result<Vec<Drink>, DatabaseError> {
        let inner = self.inner.read().await;
        Ok(inner.drinks.values().cloned().collect())
    }

    async fn get(&self, id: i64) -> Result<Option<Drink>, DatabaseError> {
        let inner = self.inner.read().await;
        Ok(inner.drinks.get(&id).cloned())
    }

    async fn insert(&self, drink: NewDrink) -> Result<Drink, DatabaseError> {
        let mut inner = self.inner.write().await;
        Ok(inner.push(drink))
    }

    async fn update(&self, drink: &Drink) -> Result<Option<Drink>, DatabaseError> {
        let mut inner = self.inner.write().await;
        match inner.drinks.get_mut(&drink.id) {
            Some(existing) => {
                existing.title = drink.title.clone();
                existing.recipe = drink.recipe.clone();
                Ok(Some(existing.clone()))
            }
            None => Ok(None),
        }
    }

    async fn delete(&self, id: i64) -> Result<bool, DatabaseError> {
        let mut inner = self.inner.write().await;
        Ok(inner.drinks.remove(&id).is_some())
    }

    async fn health_check(&self) -> Result<(), DatabaseError> {
        Ok(())
    }

    async fn reset(&self) -> Result<(), DatabaseError> {
        let mut inner = self.inner.write().await;
        inner.drinks.clear();
        inner.push(NewDrink::seed());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::models::drink::Ingredient;

    fn mocha() -> NewDrink {
        NewDrink {
            title: "Mocha".into(),
            recipe: vec![Ingredient { name: "chocolate".into(), color: "brown".into(), parts: 1 }],
        }
    }

    #[tokio::test]
    async fn ids_are_not_reused_after_delete() {
        let store = MemoryDrinkStore::new();
        let first = store.insert(mocha()).await.unwrap();
        assert!(store.delete(first.id).await.unwrap());

        let second = store.insert(mocha()).await.unwrap();
        assert!(second.id > first.id);
        assert!(!store.delete(first.id).await.unwrap());
    }

    #[tokio::test]
    async fn update_of_missing_row_is_none() {
        let store = MemoryDrinkStore::new();
        let ghost = Drink { id: 42, title: "Ghost".into(), recipe: vec![] };
        assert!(store.update(&ghost).await.unwrap().is_none());
        assert!(store.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn reset_leaves_only_the_seed_drink() {
        let store = MemoryDrinkStore::with_drinks(vec![mocha(), mocha()]);
        store.reset().await.unwrap();

        let drinks = store.list().await.unwrap();
        assert_eq!(drinks.len(), 1);
        assert_eq!(drinks[0].title, "water");
        assert_eq!(drinks[0].id, 3);
    }

    #[tokio::test]
    async fn seeded_drinks_take_the_first_ids() {
        let store = MemoryDrinkStore::with_drinks(vec![mocha(), NewDrink::seed()]);

        let ids: Vec<i64> = store.list().await.unwrap().iter().map(|d| d.id).collect();
        assert_eq!(ids, vec![1, 2]);
        assert_eq!(store.insert(mocha()).await.unwrap().id, 3);
    }
}
