table! {
    peaks (id) {
        id -> Int4,
        name -> Varchar,
        lat -> Float8,
        lon -> Float8,
        owner_id -> Int4,
    }
}

table! {
    users (id) {
        id -> Int4,
        email -> Varchar,
        password -> Varchar,
        is_active -> Bool,
    }
}

joinable!(peaks -> users (owner_id));

allow_tables_to_appear_in_same_query!(
    peaks,
    users,
);
