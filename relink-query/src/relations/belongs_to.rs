//! belongsTo relations.

use std::marker::PhantomData;
use std::sync::Arc;

use crate::error::{QueryError, QueryResult};
use crate::relations::fetch::find_by_foreign_keys;
use crate::relations::getter::Getter;
use crate::relations::resolver::{ForeignKeyResolver, InclusionResolver};
use crate::relations::spec::{RelationDefinition, RelationType};
use crate::traits::{Entity, TargetRepository};

/// Access to the parent of a source entity.
///
/// ```rust,ignore
/// let customers = Getter::fixed(customer_repo.clone());
/// let customer = order_repo.create_belongs_to_accessor_for(
///     RelationDefinition::belongs_to("customer", "Order", "Customer"),
///     customers,
/// )?;
///
/// let owner = customer.get(&order).await?;
/// ```
pub struct BelongsToAccessor<S, T, R: ?Sized> {
    definition: Arc<RelationDefinition>,
    target: Getter<R>,
    _marker: PhantomData<fn() -> (S, T)>,
}

impl<S, T, R> BelongsToAccessor<S, T, R>
where
    S: Entity,
    T: Entity,
    R: TargetRepository<T> + ?Sized + 'static,
{
    /// Create an accessor for a belongsTo definition.
    pub fn new(definition: RelationDefinition, target: Getter<R>) -> QueryResult<Self> {
        definition.expect(RelationType::ManyToOne)?;
        Ok(Self {
            definition: Arc::new(definition),
            target,
            _marker: PhantomData,
        })
    }

    /// The relation definition.
    pub fn definition(&self) -> &RelationDefinition {
        &self.definition
    }

    /// Fetch the target the source points to.
    pub async fn get(&self, source: &S) -> QueryResult<T> {
        let definition = &self.definition;
        let Some(foreign_key) = source.key(&definition.key_from) else {
            return Err(QueryError::not_found(&definition.target_model)
                .with_field(&definition.key_from)
                .with_relations([definition.name.as_str()]));
        };

        let repository = self.target.get()?;
        let targets: Vec<T> =
            find_by_foreign_keys(&*repository, &definition.key_to, foreign_key.clone()).await?;

        targets
            .into_iter()
            .next()
            .ok_or_else(|| QueryError::entity_not_found(&definition.target_model, foreign_key))
    }

    /// A resolver including the target under the relation name.
    pub fn inclusion_resolver(&self) -> Arc<dyn InclusionResolver<S>> {
        Arc::new(ForeignKeyResolver::<S, T, R>::new(
            Arc::clone(&self.definition),
            self.target.clone(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::relations::lookup::tests::Product;

    struct Nothing;

    impl TargetRepository<Product> for Nothing {
        fn find_by_foreign_keys<'a>(
            &'a self,
            _field: &'a str,
            _keys: &'a [crate::identifier::Identifier],
        ) -> crate::traits::BoxFuture<'a, QueryResult<Vec<Product>>> {
            Box::pin(async { Ok(Vec::new()) })
        }

        fn create(&self, entity: Product) -> crate::traits::BoxFuture<'_, QueryResult<Product>> {
            Box::pin(async move { Ok(entity) })
        }
    }

    #[test]
    fn test_rejects_wrong_relation_type() {
        let definition = RelationDefinition::has_many("products", "Category", "Product");
        let result =
            BelongsToAccessor::<Product, Product, Nothing>::new(definition, Getter::fixed(Arc::new(Nothing)));
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_missing_target_is_not_found() {
        let definition = RelationDefinition::belongs_to("category", "Product", "Category");
        let accessor =
            BelongsToAccessor::<Product, Product, Nothing>::new(definition, Getter::fixed(Arc::new(Nothing)))
                .unwrap();

        let err = accessor.get(&Product::new(1, "pen", 9)).await.unwrap_err();
        assert!(err.is_not_found());
        assert!(err.message.contains("9"));
    }
}
