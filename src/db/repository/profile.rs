use std::str::FromStr;

use rusqlite::{params, Connection};

use crate::db::DatabaseError;
use crate::models::{UserProfile, UserRole};

pub fn insert_profile(conn: &Connection, profile: &UserProfile) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO profiles (uid, name, email, specialty, role, signature)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            profile.uid,
            profile.name,
            profile.email,
            profile.specialty,
            profile.role.as_str(),
            profile.signature,
        ],
    )?;
    Ok(())
}

pub fn get_profile(conn: &Connection, uid: &str) -> Result<Option<UserProfile>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT uid, name, email, specialty, role, signature
         FROM profiles WHERE uid = ?1",
    )?;

    let result = stmt.query_row(params![uid], |row| {
        Ok((
            row.get::<_, String>(0)?,
            row.get::<_, String>(1)?,
            row.get::<_, String>(2)?,
            row.get::<_, String>(3)?,
            row.get::<_, String>(4)?,
            row.get::<_, Option<String>>(5)?,
        ))
    });

    match result {
        Ok(raw) => Ok(Some(profile_from_row(raw)?)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// All profiles, sorted by name for the admin role table.
pub fn list_profiles(conn: &Connection) -> Result<Vec<UserProfile>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT uid, name, email, specialty, role, signature
         FROM profiles ORDER BY name ASC",
    )?;

    let rows = stmt.query_map([], |row| {
        Ok((
            row.get::<_, String>(0)?,
            row.get::<_, String>(1)?,
            row.get::<_, String>(2)?,
            row.get::<_, String>(3)?,
            row.get::<_, String>(4)?,
            row.get::<_, Option<String>>(5)?,
        ))
    })?;

    let mut profiles = Vec::new();
    for row in rows {
        profiles.push(profile_from_row(row?)?);
    }
    Ok(profiles)
}

/// Self-service update: specialty and signature only.
pub fn update_profile_details(
    conn: &Connection,
    uid: &str,
    specialty: &str,
    signature: Option<&str>,
) -> Result<(), DatabaseError> {
    let changed = conn.execute(
        "UPDATE profiles SET specialty = ?2, signature = ?3 WHERE uid = ?1",
        params![uid, specialty, signature],
    )?;
    if changed == 0 {
        return Err(DatabaseError::NotFound {
            entity_type: "profile".into(),
            id: uid.into(),
        });
    }
    Ok(())
}

/// Admin-only: overwrite the stored role.
pub fn update_profile_role(
    conn: &Connection,
    uid: &str,
    role: UserRole,
) -> Result<(), DatabaseError> {
    let changed = conn.execute(
        "UPDATE profiles SET role = ?2 WHERE uid = ?1",
        params![uid, role.as_str()],
    )?;
    if changed == 0 {
        return Err(DatabaseError::NotFound {
            entity_type: "profile".into(),
            id: uid.into(),
        });
    }
    Ok(())
}

/// Admin-only: remove the profile and its account (cascade).
pub fn delete_profile(conn: &Connection, uid: &str) -> Result<(), DatabaseError> {
    let changed = conn.execute("DELETE FROM accounts WHERE uid = ?1", params![uid])?;
    if changed == 0 {
        return Err(DatabaseError::NotFound {
            entity_type: "profile".into(),
            id: uid.into(),
        });
    }
    Ok(())
}

type ProfileRow = (String, String, String, String, String, Option<String>);

fn profile_from_row(row: ProfileRow) -> Result<UserProfile, DatabaseError> {
    let (uid, name, email, specialty, role, signature) = row;
    Ok(UserProfile {
        uid,
        name,
        email,
        specialty,
        role: UserRole::from_str(&role)?,
        signature,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::sqlite::open_memory_database;

    fn seed_account(conn: &Connection, uid: &str, email: &str) {
        conn.execute(
            "INSERT INTO accounts (uid, email, password_hash, created_at)
             VALUES (?1, ?2, 'x', '2026-01-01T00:00:00Z')",
            params![uid, email],
        )
        .unwrap();
    }

    fn sample_profile(uid: &str) -> UserProfile {
        UserProfile {
            uid: uid.to_string(),
            name: "Dra. Ana Souza".to_string(),
            email: format!("{uid}@clinic.com"),
            specialty: "Cardiologia".to_string(),
            role: UserRole::Doctor,
            signature: None,
        }
    }

    #[test]
    fn insert_and_get_round_trip() {
        let conn = open_memory_database().unwrap();
        seed_account(&conn, "u1", "u1@clinic.com");
        insert_profile(&conn, &sample_profile("u1")).unwrap();

        let loaded = get_profile(&conn, "u1").unwrap().unwrap();
        assert_eq!(loaded.name, "Dra. Ana Souza");
        assert_eq!(loaded.role, UserRole::Doctor);
        assert!(loaded.signature.is_none());
    }

    #[test]
    fn get_missing_profile_is_none() {
        let conn = open_memory_database().unwrap();
        assert!(get_profile(&conn, "nobody").unwrap().is_none());
    }

    #[test]
    fn update_details_sets_specialty_and_signature() {
        let conn = open_memory_database().unwrap();
        seed_account(&conn, "u1", "u1@clinic.com");
        insert_profile(&conn, &sample_profile("u1")).unwrap();

        update_profile_details(&conn, "u1", "Dermatologia", Some("data:image/png;base64,AAAA"))
            .unwrap();

        let loaded = get_profile(&conn, "u1").unwrap().unwrap();
        assert_eq!(loaded.specialty, "Dermatologia");
        assert_eq!(loaded.signature.as_deref(), Some("data:image/png;base64,AAAA"));
    }

    #[test]
    fn update_role_promotes_to_admin() {
        let conn = open_memory_database().unwrap();
        seed_account(&conn, "u1", "u1@clinic.com");
        insert_profile(&conn, &sample_profile("u1")).unwrap();

        update_profile_role(&conn, "u1", UserRole::Admin).unwrap();
        assert_eq!(
            get_profile(&conn, "u1").unwrap().unwrap().role,
            UserRole::Admin
        );
    }

    #[test]
    fn update_missing_profile_is_not_found() {
        let conn = open_memory_database().unwrap();
        let err = update_profile_role(&conn, "ghost", UserRole::Admin).unwrap_err();
        assert!(matches!(err, DatabaseError::NotFound { .. }));
    }

    #[test]
    fn delete_profile_cascades_from_account() {
        let conn = open_memory_database().unwrap();
        seed_account(&conn, "u1", "u1@clinic.com");
        insert_profile(&conn, &sample_profile("u1")).unwrap();

        delete_profile(&conn, "u1").unwrap();
        assert!(get_profile(&conn, "u1").unwrap().is_none());
    }

    #[test]
    fn list_profiles_sorted_by_name() {
        let conn = open_memory_database().unwrap();
        seed_account(&conn, "u1", "u1@clinic.com");
        seed_account(&conn, "u2", "u2@clinic.com");
        let mut a = sample_profile("u1");
        a.name = "Zeca Brito".into();
        let mut b = sample_profile("u2");
        b.name = "Ana Lima".into();
        insert_profile(&conn, &a).unwrap();
        insert_profile(&conn, &b).unwrap();

        let all = list_profiles(&conn).unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].name, "Ana Lima");
        assert_eq!(all[1].name, "Zeca Brito");
    }
}
