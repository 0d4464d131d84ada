// Mirrors the pre-existing `pdf_data` table; no migrations are managed here.

diesel::table! {
    pdf_data (hash) {
        hash -> Text,
        file_name -> Text,
        status -> Text,
    }
}
