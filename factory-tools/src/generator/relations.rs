use crate::generator::mapper::GeneratorMapper;
use crate::models::{ModelDefinition, RelationKind};

/// Foreign keys of the model's belongs-to relations, each paired with an expression that
/// builds the related model through its factory. Other relation kinds have no column on
/// this model's table and are ignored.
pub fn scan_relationships(
    model: &ModelDefinition,
    mapper: &GeneratorMapper,
) -> Vec<(String, String)> {
    model
        .relations
        .iter()
        .filter(|relation| relation.kind == RelationKind::BelongsTo)
        .map(|relation| {
            (
                relation.foreign_key(),
                mapper.relation_expression(&relation.related),
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::emitter::FactoryStyle;
    use crate::models::{ModelIdentity, Relation};

    fn relation(name: &str, kind: RelationKind, related: &str) -> Relation {
        Relation {
            name: name.to_string(),
            kind,
            related: ModelIdentity::new(related),
            foreign_key: None,
            owner_key: "id".to_string(),
        }
    }

    #[test]
    fn only_belongs_to_relations_are_used() {
        let model = ModelDefinition {
            relations: vec![
                relation("comments", RelationKind::HasMany, r"App\Models\Comment"),
                relation("parentComment", RelationKind::BelongsTo, r"App\Models\Comment"),
                relation("tags", RelationKind::BelongsToMany, r"App\Models\Tag"),
                Relation {
                    foreign_key: Some("author".to_string()),
                    ..relation("writer", RelationKind::BelongsTo, r"App\Models\User")
                },
                relation("image", RelationKind::MorphOne, r"App\Models\Image"),
            ],
            ..ModelDefinition::new(r"App\Models\Comment")
        };

        let entries = scan_relationships(&model, &GeneratorMapper::new(FactoryStyle::Class));

        assert_eq!(
            entries,
            vec![
                (
                    "parent_comment_id".to_string(),
                    r"\App\Models\Comment::factory()".to_string()
                ),
                ("author".to_string(), r"\App\Models\User::factory()".to_string()),
            ]
        );
    }

    #[test]
    fn models_without_relations() {
        let model = ModelDefinition::new(r"App\Models\Tag");

        assert!(scan_relationships(&model, &GeneratorMapper::new(FactoryStyle::Method)).is_empty());
    }
}
