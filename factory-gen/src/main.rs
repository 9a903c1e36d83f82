use crate::cli::Cli;
use clap::Parser;
use factory_tools::{Connections, FactoryConfig, FactoryGenerator, GenerationOutcome, Result};
use tracing::instrument;
use tracing_subscriber::EnvFilter;

mod cli;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    run(cli).await?;

    Ok(())
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}

#[instrument(skip_all)]
async fn run(cli: Cli) -> Result<Vec<GenerationOutcome>> {
    let mut config = FactoryConfig::load(cli.config.as_deref(), &cli.project_root())?;
    config.merge_overrides(cli.config_overrides());

    let mut connections = Connections::new(&config.default_connection, config.connections.clone());
    let generator = FactoryGenerator::new(&config, cli.generate_options())?;

    Ok(generator.run(&mut connections).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use factory_tools::SqlitePoolWrapper;
    use std::path::Path;

    fn write(root: &Path, path: &str, content: &str) {
        let path = root.join(path);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, content).unwrap();
    }

    async fn create_database(path: &Path) -> String {
        let url = format!("sqlite://{}?mode=rwc", path.display());
        let db = SqlitePoolWrapper::new(&url).await.unwrap();
        db.execute_non_query(
            r#"
            create table "blog_posts" (
                "id" integer primary key autoincrement not null,
                "title" varchar not null,
                "status" varchar check ("status" in ('draft', 'published')) not null,
                "author_id" integer not null,
                "published_at" datetime,
                "created_at" datetime,
                "updated_at" datetime
            );
            create table "tags" (
                "id" integer primary key autoincrement not null,
                "label" varchar not null
            );
            "#,
        )
        .await
        .unwrap();

        url
    }

    #[tokio::test]
    async fn generates_factories_for_a_project() {
        let dir = tempfile::tempdir().unwrap();
        let url = create_database(&dir.path().join("database.sqlite")).await;
        write(
            dir.path(),
            "app/Models/Blog/BlogPost.toml",
            r#"
            [[relations]]
            name = "author"
            kind = "belongs_to"
            related = 'App\Models\User'
            "#,
        );
        write(dir.path(), "app/Models/Tag.toml", "");
        write(dir.path(), "app/Models/Concerns/HasSlug.toml", "kind = \"trait\"");

        let cli = Cli::try_parse_from([
            "factory-gen".to_string(),
            "--base-path".to_string(),
            dir.path().display().to_string(),
            "--database-url".to_string(),
            url,
            "--recursive".to_string(),
        ])
        .unwrap();

        let outcomes = run(cli).await.unwrap();

        assert_eq!(outcomes.len(), 3);
        assert!(matches!(outcomes[0], GenerationOutcome::Created { .. }));
        assert!(matches!(outcomes[1], GenerationOutcome::NotAModel { .. }));
        assert!(matches!(outcomes[2], GenerationOutcome::Created { .. }));

        let post =
            std::fs::read_to_string(dir.path().join("database/factories/Blog/BlogPostFactory.php"))
                .unwrap();
        assert!(post.contains(r"namespace Database\Factories\Blog;"));
        assert!(post.contains("'title' => $this->faker->sentence(),"));
        assert!(post.contains("'status' => $this->faker->randomElement(['draft', 'published']),"));
        assert!(post.contains(r"'author_id' => \App\Models\User::factory(),"));
        assert!(post.contains(
            "'published_at' => $this->faker->boolean() ? $this->faker->dateTime() : null,"
        ));
        assert!(!post.contains("'id'"));
        assert!(!post.contains("created_at"));

        let tag = std::fs::read_to_string(dir.path().join("database/factories/TagFactory.php"))
            .unwrap();
        assert!(tag.contains("'label' => $this->faker->word(),"));
    }

    #[tokio::test]
    async fn legacy_factories_from_a_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let url = create_database(&dir.path().join("database.sqlite")).await;
        write(dir.path(), "src/Tag.toml", "");
        write(
            dir.path(),
            "factory-gen.toml",
            &format!(
                r#"
                models_dir = "src"
                app_path = "src"
                output_dir = "factories"
                style = "method"

                [connections.default]
                url = "{url}"
                "#
            ),
        );

        let cli = Cli::try_parse_from([
            "factory-gen".to_string(),
            "--base-path".to_string(),
            dir.path().display().to_string(),
            "Tag".to_string(),
        ])
        .unwrap();

        let outcomes = run(cli).await.unwrap();

        assert!(matches!(outcomes[..], [GenerationOutcome::Created { .. }]));
        let tag =
            std::fs::read_to_string(dir.path().join("factories/TagFactory.php")).unwrap();
        assert!(tag.contains(r"$factory->define(App\Tag::class, function (Faker $faker) {"));
        assert!(tag.contains("'label' => $faker->word(),"));
    }

    #[tokio::test]
    async fn invalid_config_files_fail() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "factory-gen.toml", "style = \"closure\"");

        let cli = Cli::try_parse_from([
            "factory-gen".to_string(),
            "--base-path".to_string(),
            dir.path().display().to_string(),
        ])
        .unwrap();

        assert!(run(cli).await.is_err());
    }

    #[tokio::test]
    async fn config_is_only_looked_up_in_the_project_root() {
        let workspace = tempfile::tempdir().unwrap();
        let url = create_database(&workspace.path().join("database.sqlite")).await;
        write(
            workspace.path(),
            "factory-gen.toml",
            "style = \"method\"\noutput_dir = \"elsewhere\"",
        );
        let project = workspace.path().join("project");
        write(&project, "app/Models/Tag.toml", "");

        let cli = Cli::try_parse_from([
            "factory-gen".to_string(),
            "--base-path".to_string(),
            project.display().to_string(),
            "--database-url".to_string(),
            url,
        ])
        .unwrap();

        let outcomes = run(cli).await.unwrap();

        assert!(matches!(outcomes[..], [GenerationOutcome::Created { .. }]));
        let tag = std::fs::read_to_string(project.join("database/factories/TagFactory.php"))
            .unwrap();
        assert!(tag.contains("class TagFactory extends Factory"));
        assert!(!project.join("elsewhere").exists());
    }
}
