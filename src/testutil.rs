use libsql::Builder;
use std::path::Path;

pub struct BookmarkFixture {
    pub text: Option<&'static str>,
    pub annotation: Option<&'static str>,
    pub volume_id: Option<&'static str>,
}

impl BookmarkFixture {
    pub fn new(
        text: Option<&'static str>,
        annotation: Option<&'static str>,
        volume_id: Option<&'static str>,
    ) -> Self {
        Self {
            text,
            annotation,
            volume_id,
        }
    }
}

/// Writes a minimal device database. The column order deliberately differs from
/// the firmware's.
pub async fn write_kobo_db(path: &Path, bookmarks: &[BookmarkFixture]) {
    let db = Builder::new_local(path).build().await.expect("kobo db");
    let conn = db.connect().expect("kobo conn");
    conn.execute_batch(
        r#"
        CREATE TABLE Bookmark (
            BookmarkID TEXT NOT NULL PRIMARY KEY,
            VolumeID TEXT,
            ContentID TEXT,
            Annotation TEXT,
            DateCreated TEXT,
            Text TEXT,
            Hidden BOOL DEFAULT 0
        );
        "#,
    )
    .await
    .expect("kobo schema");

    for (index, bookmark) in bookmarks.iter().enumerate() {
        conn.execute(
            "INSERT INTO Bookmark (BookmarkID, VolumeID, ContentID, Annotation, DateCreated, Text) VALUES (?, ?, ?, ?, ?, ?)",
            libsql::params![
                format!("bookmark-{index}"),
                bookmark.volume_id,
                bookmark.volume_id,
                bookmark.annotation,
                "2024-05-01T10:00:00Z",
                bookmark.text
            ],
        )
        .await
        .expect("insert bookmark");
    }
}
