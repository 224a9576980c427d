use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::FromRow;

/// Справочник модулей курса. Данные только для чтения.
#[derive(Clone, Debug)]
pub struct Catalog {
    pool: SqlitePool,
}

#[derive(Debug, Clone, FromRow)]
pub struct CatalogItem {
    pub id: i64,
    pub description: String,
}

const CATALOG_ITEMS: [(i64, &str); 3] = [
    (
        1,
        "VCc01.Работа с таблицам через API, использование таблиц в виде базы данных",
    ),
    (2, "VCc02.Использование MCP серверов в Cursor"),
    (
        3,
        "VCc03.Что такое автономные агент, и как это работает. Пример с базовым парсингом сайта",
    ),
];

impl Catalog {
    pub async fn new(path: &str) -> Result<Self, sqlx::Error> {
        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await?;

        Ok(Catalog { pool })
    }

    /// Создание таблицы и заполнение каталога
    pub async fn init(&self) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS catalog (
                id INTEGER PRIMARY KEY,
                description TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        // Каталог пересобирается при каждом старте
        sqlx::query("DELETE FROM catalog").execute(&self.pool).await?;

        for (id, description) in CATALOG_ITEMS {
            sqlx::query("INSERT OR REPLACE INTO catalog (id, description) VALUES (?, ?)")
                .bind(id)
                .bind(description)
                .execute(&self.pool)
                .await?;
        }

        Ok(())
    }

    pub async fn all_items(&self) -> Result<Vec<CatalogItem>, sqlx::Error> {
        sqlx::query_as::<_, CatalogItem>("SELECT id, description FROM catalog ORDER BY id")
            .fetch_all(&self.pool)
            .await
    }

    pub async fn item_by_id(&self, id: i64) -> Result<Option<CatalogItem>, sqlx::Error> {
        sqlx::query_as::<_, CatalogItem>("SELECT id, description FROM catalog WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn memory_catalog() -> Catalog {
        // Одно соединение, иначе каждый коннект получит свою пустую :memory: базу
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        let catalog = Catalog { pool };
        catalog.init().await.unwrap();
        catalog
    }

    #[tokio::test]
    async fn init_seeds_three_items_in_order() {
        let catalog = memory_catalog().await;
        let items = catalog.all_items().await.unwrap();
        assert_eq!(items.len(), 3);
        assert_eq!(items[0].id, 1);
        assert_eq!(items[2].id, 3);
        assert!(items[0].description.starts_with("VCc01"));
    }

    #[tokio::test]
    async fn init_is_idempotent() {
        let catalog = memory_catalog().await;
        catalog.init().await.unwrap();
        assert_eq!(catalog.all_items().await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn item_lookup_by_id() {
        let catalog = memory_catalog().await;
        let item = catalog.item_by_id(2).await.unwrap().unwrap();
        assert!(item.description.contains("MCP"));
        assert!(catalog.item_by_id(42).await.unwrap().is_none());
    }
}
