use crate::common::context::Context;
use crate::common::error::ServiceResult;
use crate::common::init;
use crate::entities::messages::{CreateMessageArgs, MessagePredicate};
use crate::repositories::messages;
use crate::settings::AppSettings;
use chrono::{TimeDelta, Utc};
use tracing::info;

/// (name, email, subject, body, age in minutes, read)
const FIXTURES: &[(&str, &str, &str, &str, i64, bool)] = &[
    (
        "Jean Dupont",
        "jean.dupont@email.com",
        "Demande de devis",
        "Bonjour, je souhaiterais obtenir un devis pour la création d'un site web e-commerce. Pouvez-vous me contacter ?",
        2 * 60,
        false,
    ),
    (
        "Marie Martin",
        "marie.martin@email.com",
        "Question sur vos services",
        "Bonjour, proposez-vous des services de maintenance pour les sites web ? Quels sont vos tarifs ?",
        24 * 60,
        true,
    ),
    (
        "Pierre Dubois",
        "pierre.dubois@email.com",
        "Collaboration potentielle",
        "Bonjour, je représente une entreprise tech et nous cherchons des partenaires pour nos projets.",
        5 * 60,
        false,
    ),
    (
        "Sophie Bernard",
        "sophie.bernard@email.com",
        "Refonte de site web",
        "Bonjour, notre site actuel est obsolète et nous souhaitons le refaire complètement. Pouvez-vous nous aider ?",
        48 * 60,
        true,
    ),
    (
        "Thomas Petit",
        "thomas.petit@email.com",
        "Formation développement web",
        "Bonjour, proposez-vous des formations en développement web ? Je suis débutant.",
        30,
        false,
    ),
    (
        "Caroline Leroy",
        "caroline.leroy@email.com",
        "Application mobile",
        "Bonjour, nous avons besoin d'une application mobile pour notre startup.",
        3 * 60,
        false,
    ),
    (
        "Laurent Moreau",
        "laurent.moreau@email.com",
        "SEO et référencement",
        "Bonjour, mon site web a besoin d'être mieux référencé sur Google. Proposez-vous des services SEO ?",
        72 * 60,
        true,
    ),
    (
        "Isabelle Girard",
        "isabelle.girard@email.com",
        "Projet urgent",
        "Bonjour, nous avons un projet urgent qui doit être terminé dans 2 semaines. Êtes-vous disponible ?",
        0,
        false,
    ),
];

pub async fn serve(settings: &AppSettings) -> anyhow::Result<()> {
    let ctx = init::initialize_state(settings).await?;
    let inserted = match seed(&ctx).await {
        Ok(inserted) => inserted,
        Err(e) => anyhow::bail!("Failed to seed the inbox: {}", e.message()),
    };
    let unread = messages::count_where(&ctx, MessagePredicate::IsRead(false)).await?;
    info!(inserted, unread, "Inbox seeded");
    Ok(())
}

/// Replaces every stored message with the demonstration fixtures.
pub async fn seed<C: Context>(ctx: &C) -> ServiceResult<usize> {
    let removed = messages::delete_all(ctx).await?;
    info!(removed, "Cleared existing messages");

    let now = Utc::now();
    for &(name, email, subject, body, age_minutes, is_read) in FIXTURES {
        let args = CreateMessageArgs {
            name: name.to_string(),
            email: email.to_string(),
            subject: subject.to_string(),
            body: body.to_string(),
        };
        let created_at = now - TimeDelta::minutes(age_minutes);
        messages::create_with(ctx, &args, created_at, is_read).await?;
    }
    Ok(FIXTURES.len())
}
