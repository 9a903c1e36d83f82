use crate::catalog::{ModelCatalog, Resolution};
use crate::config::FactoryConfig;
use crate::database::ConnectionProvider;
use crate::emitter::FactoryRenderer;
use crate::generator::PropertyResolver;
use crate::models::{ModelDefinition, ModelIdentity};
use crate::Result;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, instrument, warn};

/// What to generate, on top of the configuration.
#[derive(Debug, Clone, Default)]
pub struct GenerateOptions {
    /// Models to generate factories for. Empty means every model in the models directory.
    pub models: Vec<String>,
    /// Overwrite factories that already exist.
    pub force: bool,
    /// Search subdirectories of the models directory and mirror them in the output.
    pub recursive: bool,
    /// Replaces the namespace inferred from the models directory.
    pub namespace: Option<String>,
}

/// How generating the factory of one model went.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum GenerationOutcome {
    Created {
        model: ModelIdentity,
        path: PathBuf,
    },
    SkippedExists {
        model: ModelIdentity,
        path: PathBuf,
    },
    NotFound {
        model: ModelIdentity,
    },
    NotAModel {
        model: ModelIdentity,
    },
    Failed {
        model: ModelIdentity,
        message: String,
    },
    WriteFailed {
        model: ModelIdentity,
        path: PathBuf,
        message: String,
    },
}

impl GenerationOutcome {
    pub fn model(&self) -> &ModelIdentity {
        match self {
            GenerationOutcome::Created { model, .. }
            | GenerationOutcome::SkippedExists { model, .. }
            | GenerationOutcome::NotFound { model }
            | GenerationOutcome::NotAModel { model }
            | GenerationOutcome::Failed { model, .. }
            | GenerationOutcome::WriteFailed { model, .. } => model,
        }
    }

    fn log(&self) {
        let model = self.model();
        match self {
            GenerationOutcome::Created { .. } => info!(%model, "{}", self),
            GenerationOutcome::SkippedExists { .. } => warn!(%model, "{}", self),
            GenerationOutcome::NotAModel { .. } => debug!(%model, "{}", self),
            GenerationOutcome::NotFound { .. }
            | GenerationOutcome::Failed { .. }
            | GenerationOutcome::WriteFailed { .. } => error!(%model, "{}", self),
        }
    }
}

impl Display for GenerationOutcome {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            GenerationOutcome::Created { path, .. } => {
                write!(f, "Model factory created: {}", path.display())
            }
            GenerationOutcome::SkippedExists { path, .. } => write!(
                f,
                "Model factory exists, use --force to overwrite: {}",
                path.display()
            ),
            GenerationOutcome::NotFound { model } => {
                write!(f, "Unable to find '{model}' model")
            }
            GenerationOutcome::NotAModel { model } => {
                write!(f, "Skipping '{model}', it is not a model")
            }
            GenerationOutcome::Failed { model, message } => {
                write!(f, "Could not analyze model '{model}': {message}")
            }
            GenerationOutcome::WriteFailed { path, message, .. } => write!(
                f,
                "Failed to create model factory: {}: {message}",
                path.display()
            ),
        }
    }
}

/// Generates factories for a set of models, one at a time.
pub struct FactoryGenerator<'a> {
    config: &'a FactoryConfig,
    options: GenerateOptions,
    catalog: ModelCatalog,
    renderer: FactoryRenderer,
    resolver: PropertyResolver<'a>,
    output_dir: PathBuf,
}

impl<'a> FactoryGenerator<'a> {
    /// Fails if a custom template can not be loaded.
    pub fn new(config: &'a FactoryConfig, options: GenerateOptions) -> Result<Self> {
        let catalog = ModelCatalog::new(config, options.namespace.as_deref(), options.recursive);
        let templates_dir = config
            .templates_dir
            .as_deref()
            .map(|dir| config.resolve_path(dir));
        let renderer = FactoryRenderer::new(config.style, templates_dir.as_deref())?;

        Ok(Self {
            config,
            catalog,
            renderer,
            resolver: PropertyResolver::new(config.style, &config.custom_types),
            output_dir: config.resolve_path(&config.output_dir),
            options,
        })
    }

    /// Runs every target to completion. Problems with one model never stop the others.
    #[instrument(skip_all)]
    pub async fn run<P: ConnectionProvider>(&self, connections: &mut P) -> Vec<GenerationOutcome> {
        let targets = self.catalog.targets(&self.options.models);
        debug!(count = targets.len(), "Found models");

        let mut outcomes = Vec::with_capacity(targets.len());
        for model in targets {
            let outcome = self.generate(model, connections).await;
            outcome.log();
            outcomes.push(outcome);
        }

        outcomes
    }

    async fn generate<P: ConnectionProvider>(
        &self,
        model: ModelIdentity,
        connections: &mut P,
    ) -> GenerationOutcome {
        let (path, factory_namespace) = self.output_location(&model);

        if !self.options.force && tokio::fs::try_exists(&path).await.unwrap_or(false) {
            return GenerationOutcome::SkippedExists { model, path };
        }

        let definition = match self.catalog.resolve(&model).await {
            Ok(Resolution::Model(definition)) => definition,
            Ok(Resolution::NotAModel(_)) => return GenerationOutcome::NotAModel { model },
            Ok(Resolution::NotFound) => return GenerationOutcome::NotFound { model },
            Err(e) => {
                return GenerationOutcome::Failed {
                    model,
                    message: e.to_string(),
                }
            }
        };

        let content = match self
            .render(&definition, &factory_namespace, connections)
            .await
        {
            Ok(content) => content,
            Err(e) => {
                return GenerationOutcome::Failed {
                    model,
                    message: e.to_string(),
                }
            }
        };

        match write_file(&path, &content).await {
            Ok(()) => GenerationOutcome::Created { model, path },
            Err(e) => GenerationOutcome::WriteFailed {
                model,
                path,
                message: e.to_string(),
            },
        }
    }

    async fn render<P: ConnectionProvider>(
        &self,
        definition: &ModelDefinition,
        factory_namespace: &str,
        connections: &mut P,
    ) -> Result<String> {
        let properties = self.resolver.resolve(definition, connections).await?;

        self.renderer
            .render(&definition.identity, factory_namespace, &properties)
    }

    /// The file the factory is written to and the namespace of the factory class.
    ///
    /// When recursive, models in subnamespaces of the models namespace get their factory in
    /// the matching subdirectory and subnamespace.
    pub fn output_location(&self, model: &ModelIdentity) -> (PathBuf, String) {
        let nested = if self.options.recursive {
            model
                .namespace_below(self.catalog.models_namespace())
                .unwrap_or_default()
        } else {
            Vec::new()
        };

        let mut path = self.output_dir.clone();
        for segment in &nested {
            path.push(segment);
        }
        path.push(format!("{}Factory.php", model.short_name()));

        let namespace = ModelIdentity::from_segments(
            std::iter::once(self.config.factory_namespace.as_str()).chain(nested),
        );

        (path, namespace.into())
    }
}

async fn write_file(path: &Path, content: &str) -> Result {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(path, content).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::{DatabaseDriver, SqlRow};
    use crate::test_helpers::{text_rows, FakeConnections, FakeExecutor};
    use indoc::indoc;
    use tempfile::TempDir;

    fn project(files: &[(&str, &str)]) -> (TempDir, FactoryConfig) {
        let dir = tempfile::tempdir().unwrap();
        for (path, content) in files {
            let path = dir.path().join(path);
            std::fs::create_dir_all(path.parent().unwrap()).unwrap();
            std::fs::write(path, content).unwrap();
        }

        let config = FactoryConfig {
            base_path: dir.path().to_path_buf(),
            ..Default::default()
        };

        (dir, config)
    }

    /// A database where every table has an id and a title.
    fn database() -> FakeConnections {
        FakeConnections::new(FakeExecutor::new(DatabaseDriver::Sqlite, |sql, _| {
            if sql.contains("pragma_table_info") {
                Ok(text_rows(&[
                    ["id", "integer", "", "false"],
                    ["title", "varchar", "", "false"],
                ]))
            } else {
                Ok(Vec::<SqlRow>::new())
            }
        }))
    }

    fn read(dir: &TempDir, path: &str) -> String {
        std::fs::read_to_string(dir.path().join(path)).unwrap()
    }

    #[tokio::test]
    async fn creates_factories() {
        let (dir, config) = project(&[
            ("app/Models/Post.toml", ""),
            ("app/Models/BaseModel.toml", "kind = \"abstract\""),
        ]);
        let generator = FactoryGenerator::new(&config, GenerateOptions::default()).unwrap();

        let outcomes = generator.run(&mut database()).await;

        assert_eq!(
            outcomes,
            vec![
                GenerationOutcome::NotAModel {
                    model: ModelIdentity::new(r"App\Models\BaseModel")
                },
                GenerationOutcome::Created {
                    model: ModelIdentity::new(r"App\Models\Post"),
                    path: dir.path().join("database/factories/PostFactory.php"),
                },
            ]
        );
        similar_asserts::assert_eq!(
            read(&dir, "database/factories/PostFactory.php"),
            indoc! {r#"
                <?php

                declare(strict_types=1);

                namespace Database\Factories;

                use Illuminate\Database\Eloquent\Factories\Factory;
                use App\Models\Post;

                class PostFactory extends Factory
                {
                    /**
                    * The name of the factory's corresponding model.
                    *
                    * @var string
                    */
                    protected $model = Post::class;

                    /**
                    * Define the model's default state.
                    *
                    * @return array
                    */
                    public function definition()
                    {
                        return [
                            'title' => $this->faker->sentence(),
                        ];
                    }
                }
            "#}
        );
        assert!(!dir.path().join("database/factories/BaseModelFactory.php").exists());
    }

    #[tokio::test]
    async fn existing_factories_are_kept_without_force() {
        let (dir, config) = project(&[
            ("app/Models/Post.toml", ""),
            ("database/factories/PostFactory.php", "hand written"),
        ]);
        let generator = FactoryGenerator::new(&config, GenerateOptions::default()).unwrap();

        let outcomes = generator.run(&mut database()).await;
        let second_outcomes = generator.run(&mut database()).await;

        let skipped = GenerationOutcome::SkippedExists {
            model: ModelIdentity::new(r"App\Models\Post"),
            path: dir.path().join("database/factories/PostFactory.php"),
        };
        assert_eq!(outcomes, vec![skipped.clone()]);
        assert_eq!(second_outcomes, vec![skipped]);
        assert_eq!(read(&dir, "database/factories/PostFactory.php"), "hand written");
    }

    #[tokio::test]
    async fn force_overwrites() {
        let (dir, config) = project(&[
            ("app/Models/Post.toml", ""),
            ("database/factories/PostFactory.php", "hand written"),
        ]);
        let generator = FactoryGenerator::new(
            &config,
            GenerateOptions {
                force: true,
                ..Default::default()
            },
        )
        .unwrap();

        let outcomes = generator.run(&mut database()).await;

        assert!(matches!(outcomes[..], [GenerationOutcome::Created { .. }]));
        assert!(read(&dir, "database/factories/PostFactory.php").contains("class PostFactory"));
    }

    #[tokio::test]
    async fn recursive_runs_mirror_the_namespace() {
        let (dir, config) = project(&[
            ("app/Models/User.toml", ""),
            ("app/Models/Blog/Post.toml", ""),
        ]);
        let generator = FactoryGenerator::new(
            &config,
            GenerateOptions {
                recursive: true,
                ..Default::default()
            },
        )
        .unwrap();

        let outcomes = generator.run(&mut database()).await;

        assert_eq!(outcomes.len(), 2);
        let post = read(&dir, "database/factories/Blog/PostFactory.php");
        assert!(post.contains("namespace Database\\Factories\\Blog;"));
        assert!(post.contains("use App\\Models\\Blog\\Post;"));
        let user = read(&dir, "database/factories/UserFactory.php");
        assert!(user.contains("namespace Database\\Factories;"));
    }

    #[test]
    fn output_locations() {
        let config = FactoryConfig {
            base_path: PathBuf::from("/srv"),
            ..Default::default()
        };
        let flat = FactoryGenerator::new(&config, GenerateOptions::default()).unwrap();
        let recursive = FactoryGenerator::new(
            &config,
            GenerateOptions {
                recursive: true,
                ..Default::default()
            },
        )
        .unwrap();
        let post = ModelIdentity::new(r"App\Models\Blog\Post");

        assert_eq!(
            flat.output_location(&post),
            (
                PathBuf::from("/srv/database/factories/PostFactory.php"),
                r"Database\Factories".to_string()
            )
        );
        assert_eq!(
            recursive.output_location(&post),
            (
                PathBuf::from("/srv/database/factories/Blog/PostFactory.php"),
                r"Database\Factories\Blog".to_string()
            )
        );
        assert_eq!(
            recursive.output_location(&ModelIdentity::new(r"Vendor\Thing")),
            (
                PathBuf::from("/srv/database/factories/ThingFactory.php"),
                r"Database\Factories".to_string()
            )
        );
    }

    #[tokio::test]
    async fn explicit_models() {
        let (dir, config) = project(&[
            ("app/Models/Post.toml", ""),
            ("app/Models/User.toml", ""),
        ]);
        let generator = FactoryGenerator::new(
            &config,
            GenerateOptions {
                models: vec![
                    "User".to_string(),
                    r"App\Models\User".to_string(),
                    "Missing".to_string(),
                ],
                ..Default::default()
            },
        )
        .unwrap();

        let outcomes = generator.run(&mut database()).await;

        assert_eq!(
            outcomes,
            vec![
                GenerationOutcome::Created {
                    model: ModelIdentity::new(r"App\Models\User"),
                    path: dir.path().join("database/factories/UserFactory.php"),
                },
                GenerationOutcome::NotFound {
                    model: ModelIdentity::new(r"App\Models\Missing")
                },
            ]
        );
        assert!(!dir.path().join("database/factories/PostFactory.php").exists());
    }

    #[tokio::test]
    async fn namespace_override_applies_to_discovery_and_lookup() {
        let (dir, config) = project(&[
            ("app/Models/Post.toml", ""),
            ("app/Models/Blog/Comment.toml", ""),
        ]);
        let generator = FactoryGenerator::new(
            &config,
            GenerateOptions {
                recursive: true,
                namespace: Some(r"Domain\Models".to_string()),
                ..Default::default()
            },
        )
        .unwrap();

        let outcomes = generator.run(&mut database()).await;

        assert_eq!(
            outcomes,
            vec![
                GenerationOutcome::Created {
                    model: ModelIdentity::new(r"Domain\Models\Blog\Comment"),
                    path: dir.path().join("database/factories/Blog/CommentFactory.php"),
                },
                GenerationOutcome::Created {
                    model: ModelIdentity::new(r"Domain\Models\Post"),
                    path: dir.path().join("database/factories/PostFactory.php"),
                },
            ]
        );
        let post = read(&dir, "database/factories/PostFactory.php");
        assert!(post.contains(r"use Domain\Models\Post;"));
        assert!(post.contains("'title' => $this->faker->sentence(),"));
        let comment = read(&dir, "database/factories/Blog/CommentFactory.php");
        assert!(comment.contains(r"namespace Database\Factories\Blog;"));
        assert!(comment.contains(r"use Domain\Models\Blog\Comment;"));

        let explicit = FactoryGenerator::new(
            &config,
            GenerateOptions {
                models: vec![r"Domain\Models\Post".to_string(), r"App\Models\Post".to_string()],
                force: true,
                namespace: Some(r"Domain\Models".to_string()),
                ..Default::default()
            },
        )
        .unwrap();

        let outcomes = explicit.run(&mut database()).await;

        assert!(matches!(
            outcomes[..],
            [GenerationOutcome::Created { .. }, GenerationOutcome::Created { .. }]
        ));
    }

    #[tokio::test]
    async fn failures_are_reported_and_do_not_stop_the_run() {
        let (dir, config) = project(&[
            ("app/Models/Broken.toml", "primary_key = ["),
            ("app/Models/Legacy.toml", "connection = \"legacy\""),
            ("app/Models/Post.toml", ""),
        ]);
        let generator = FactoryGenerator::new(&config, GenerateOptions::default()).unwrap();

        let outcomes = generator.run(&mut database()).await;

        assert_eq!(outcomes.len(), 3);
        assert!(matches!(
            &outcomes[0],
            GenerationOutcome::Failed { message, .. } if message.contains("Broken.toml")
        ));
        assert!(matches!(
            &outcomes[1],
            GenerationOutcome::Failed { message, .. } if message.contains("legacy")
        ));
        assert!(matches!(outcomes[2], GenerationOutcome::Created { .. }));
        assert!(!dir.path().join("database/factories/BrokenFactory.php").exists());
    }

    #[tokio::test]
    async fn write_failures_are_reported() {
        let (_dir, config) = project(&[
            ("app/Models/Post.toml", ""),
            // A file where the output directory should be.
            ("database/factories", ""),
        ]);
        let generator = FactoryGenerator::new(&config, GenerateOptions::default()).unwrap();

        let outcomes = generator.run(&mut database()).await;

        assert!(matches!(outcomes[..], [GenerationOutcome::WriteFailed { .. }]));
    }

    #[tokio::test]
    async fn missing_models_directory_generates_nothing() {
        let (_dir, config) = project(&[]);
        let generator = FactoryGenerator::new(&config, GenerateOptions::default()).unwrap();

        assert!(generator.run(&mut database()).await.is_empty());
    }

    #[test]
    fn outcome_messages() {
        let model = ModelIdentity::new(r"App\Models\Post");

        assert_eq!(
            GenerationOutcome::SkippedExists {
                model: model.clone(),
                path: PathBuf::from("database/factories/PostFactory.php"),
            }
            .to_string(),
            "Model factory exists, use --force to overwrite: database/factories/PostFactory.php"
        );
        assert_eq!(
            GenerationOutcome::NotFound {
                model: model.clone()
            }
            .to_string(),
            r"Unable to find 'App\Models\Post' model"
        );
        assert_eq!(
            GenerationOutcome::Failed {
                model: model.clone(),
                message: "boom".to_string()
            }
            .model(),
            &model
        );
    }
}
