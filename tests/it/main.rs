use std::error::Error;

use bucket_csv::{BlobStorageProvider, FetchError, LocalDisk, ObjectFetcher, ParseError, Table};

fn fetcher() -> (tempfile::TempDir, ObjectFetcher<LocalDisk>) {
    let dir = tempfile::tempdir().unwrap();
    let fetcher = ObjectFetcher::with_provider(LocalDisk::new(dir.path()));
    (dir, fetcher)
}

/// A UTF-8 CSV with a header and N rows yields N rows with the header's columns, in order
#[tokio::test]
async fn utf8_csv() -> Result<(), Box<dyn Error>> {
    let (_dir, fetcher) = fetcher();
    let data = "id,ticker,price\n1,AAPL,189.5\n2,MSFT,411.2\n3,NOVO-B,€705\n";
    fetcher
        .provider()
        .put("prices/2024.csv", data.as_bytes().to_vec())
        .await?;

    let table = fetcher.fetch("prices/2024.csv").await?;

    assert_eq!(table.len(), 3);
    assert_eq!(table.columns(), ["id", "ticker", "price"]);
    assert_eq!(table.column("price").unwrap(), vec!["189.5", "411.2", "€705"]);
    Ok(())
}

/// Bytes only valid as Latin-1 still yield the table
#[tokio::test]
async fn latin1_csv() -> Result<(), Box<dyn Error>> {
    let (_dir, fetcher) = fetcher();
    fetcher
        .provider()
        .put("clients.csv", b"nome,cidade\nJo\xe3o,S\xe3o Paulo\nIn\xeas,Bras\xedlia\n".to_vec())
        .await?;

    let table = fetcher.maybe_fetch("clients.csv").await.unwrap();

    assert_eq!(table.column("nome").unwrap(), vec!["João", "Inês"]);
    assert_eq!(table.column("cidade").unwrap(), vec!["São Paulo", "Brasília"]);
    Ok(())
}

#[tokio::test]
async fn missing_object() {
    let (_dir, fetcher) = fetcher();

    assert!(fetcher.maybe_fetch("does/not/exist.csv").await.is_none());
    assert!(matches!(
        fetcher.fetch("does/not/exist.csv").await,
        Err(FetchError::NotFound { .. })
    ));
}

#[tokio::test]
async fn binary_garbage() -> Result<(), Box<dyn Error>> {
    let (_dir, fetcher) = fetcher();
    let garbage = vec![0x1f, 0x8b, 0x08, 0x00, 0x00, 0x00, 0x00, 0x00, 0xff, 0xfe, 0x2c, 0x0a];
    fetcher.provider().put("archive.gz", garbage).await?;

    assert!(fetcher.maybe_fetch("archive.gz").await.is_none());
    assert!(matches!(
        fetcher.fetch("archive.gz").await,
        Err(FetchError::Parse(ParseError::Binary))
    ));
    Ok(())
}

/// A quoted field that is never closed is malformed, not one long cell
#[tokio::test]
async fn unterminated_quote() -> Result<(), Box<dyn Error>> {
    let (_dir, fetcher) = fetcher();
    fetcher
        .provider()
        .put("open_quote.csv", b"a,b\n\"1,2\n3,4\n".to_vec())
        .await?;

    assert!(fetcher.maybe_fetch("open_quote.csv").await.is_none());
    assert!(matches!(
        fetcher.fetch("open_quote.csv").await,
        Err(FetchError::Parse(ParseError::UnterminatedQuote { line: 2 }))
    ));
    Ok(())
}

#[tokio::test]
async fn empty_object() -> Result<(), Box<dyn Error>> {
    let (_dir, fetcher) = fetcher();
    fetcher.provider().put("empty.csv", vec![]).await?;

    assert!(matches!(
        fetcher.fetch("empty.csv").await,
        Err(FetchError::Parse(ParseError::Empty))
    ));
    Ok(())
}

/// A table stored as UTF-8 CSV is fetched back unchanged
#[tokio::test]
async fn round_trip() -> Result<(), Box<dyn Error>> {
    let (_dir, fetcher) = fetcher();
    let columns = ["city", "country", "population"]
        .map(String::from)
        .to_vec();
    let rows = vec![
        vec!["Kraków", "PL", "800653"],
        vec!["Reykjavík", "IS", ""],
        vec!["\"Big\" Apple, NYC", "US", "8336817"],
    ]
    .into_iter()
    .map(|row| row.into_iter().map(String::from).collect())
    .collect();
    let table = Table::new(columns, rows)?;

    fetcher.store("cities.csv", &table).await?;

    assert_eq!(fetcher.fetch("cities.csv").await?, table);
    Ok(())
}
