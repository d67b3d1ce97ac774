use anyhow::{anyhow, bail, Result};
use loja_db::models::{NewProduct, ProductPatch};
use teloxide::prelude::*;
use teloxide::types::{InputFile, InputMedia, InputMediaPhoto, MessageId};
use tracing::{error, info};

use crate::bot::keyboards::buy_keyboard;
use crate::bot::listing::{parse_price, render_product_text};
use crate::services::catalog::allocate_product_key;
use crate::services::store::Store;
use crate::state::AppState;

const ADMIN_ONLY: &str = "Este comando só pode ser usado no canal de administração!";
const CREATE_USAGE: &str = "uso: /criarproduto Nome | 49,90 | https://arquivo [| https://imagem]";
const EDIT_USAGE: &str =
    "uso: /editarproduto CHAVE | nome=... | preco=... | arquivo=... | imagem=...";

pub async fn message_handler(
    bot: Bot,
    msg: Message,
    state: AppState,
) -> Result<(), teloxide::RequestError> {
    let Some(text) = msg.text().map(str::to_owned) else {
        return Ok(());
    };

    if msg.chat.is_private() {
        // A private text may be the answer to an open email prompt; the
        // suspended purchase flow picks it up from here.
        if state.prompts.resolve(msg.chat.id.0, text.trim()).await {
            return Ok(());
        }
        if matches!(
            split_command(&text),
            Some(("/criarproduto" | "/editarproduto", _))
        ) {
            let _ = bot.send_message(msg.chat.id, ADMIN_ONLY).await;
            return Ok(());
        }
        if text.starts_with("/start") {
            let _ = bot
                .send_message(
                    msg.chat.id,
                    "Bem-vindo! Os produtos ficam no canal da loja; \
                     toque em \"Comprar agora\" para iniciar uma compra.",
                )
                .await;
        }
        return Ok(());
    }

    let Some((command, args)) = split_command(&text) else {
        return Ok(());
    };

    match command {
        "/criarproduto" | "/editarproduto" if msg.chat.id != state.config.admin_chat_id => {
            let _ = bot.send_message(msg.chat.id, ADMIN_ONLY).await;
        }
        "/criarproduto" => {
            if let Err(e) = handle_create(&bot, &msg, &state, args).await {
                error!("criarproduto failed: {e:#}");
                let _ = bot
                    .send_message(msg.chat.id, format!("Erro ao criar produto: {e}"))
                    .await;
            }
        }
        "/editarproduto" => {
            if let Err(e) = handle_edit(&bot, &msg, &state, args).await {
                error!("editarproduto failed: {e:#}");
                let _ = bot
                    .send_message(msg.chat.id, format!("Erro ao editar produto: {e}"))
                    .await;
            }
        }
        _ => {}
    }

    Ok(())
}

fn split_command(text: &str) -> Option<(&str, &str)> {
    let text = text.trim();
    if !text.starts_with('/') {
        return None;
    }
    let (head, rest) = text.split_once(char::is_whitespace).unwrap_or((text, ""));
    // Strip the "@botname" suffix Telegram appends in groups.
    let command = head.split('@').next().unwrap_or(head);
    Some((command, rest.trim()))
}

struct CreateArgs {
    title: String,
    price_cents: i64,
    file_url: String,
    image_url: Option<String>,
}

fn parse_create_args(args: &str) -> Result<CreateArgs> {
    let parts: Vec<&str> = args.split('|').map(str::trim).collect();
    if args.trim().is_empty() || parts.len() < 3 || parts.len() > 4 {
        bail!("{CREATE_USAGE}");
    }
    if parts[0].is_empty() {
        bail!("o nome do produto não pode ser vazio");
    }
    let price_cents =
        parse_price(parts[1]).ok_or_else(|| anyhow!("preço inválido: '{}'", parts[1]))?;
    if parts[2].is_empty() {
        bail!("a URL do arquivo não pode ser vazia");
    }

    Ok(CreateArgs {
        title: parts[0].to_string(),
        price_cents,
        file_url: parts[2].to_string(),
        image_url: parts.get(3).filter(|s| !s.is_empty()).map(|s| s.to_string()),
    })
}

fn parse_edit_args(args: &str) -> Result<(String, ProductPatch)> {
    let mut parts = args.split('|').map(str::trim);
    let key = parts
        .next()
        .filter(|k| !k.is_empty())
        .ok_or_else(|| anyhow!("{EDIT_USAGE}"))?;

    let mut patch = ProductPatch::default();
    for part in parts {
        if part.is_empty() {
            continue;
        }
        let (field, value) = part
            .split_once('=')
            .ok_or_else(|| anyhow!("campo inválido: '{part}'"))?;
        let value = value.trim();
        match field.trim() {
            "nome" => patch.title = Some(value.to_string()),
            "preco" | "preço" => {
                patch.price_cents =
                    Some(parse_price(value).ok_or_else(|| anyhow!("preço inválido: '{value}'"))?);
            }
            "arquivo" => patch.file_url = Some(value.to_string()),
            "imagem" => patch.image_url = Some(value.to_string()),
            other => bail!("campo desconhecido: '{other}'"),
        }
    }

    Ok((key.to_string(), patch))
}

async fn handle_create(bot: &Bot, msg: &Message, state: &AppState, args: &str) -> Result<()> {
    let args = parse_create_args(args)?;
    let key = allocate_product_key(&state.store).await?;

    let text = render_product_text(&args.title, args.price_cents, &key);
    let public = state.config.public_chat_id;

    let posted = match &args.image_url {
        Some(raw) => {
            let url = reqwest::Url::parse(raw)
                .map_err(|_| anyhow!("URL de imagem inválida: '{raw}'"))?;
            bot.send_photo(public, InputFile::url(url))
                .caption(text)
                .reply_markup(buy_keyboard())
                .await?
        }
        None => {
            bot.send_message(public, text)
                .reply_markup(buy_keyboard())
                .await?
        }
    };

    state
        .store
        .insert_product(&NewProduct {
            product_key: key.clone(),
            title: args.title,
            price_cents: args.price_cents,
            file_url: args.file_url,
            message_id: posted.id.0,
            image_url: args.image_url,
        })
        .await?;

    info!("Product {key} posted to channel {public}");
    bot.send_message(
        msg.chat.id,
        format!("Produto criado com sucesso! A chave única para este produto é {key}."),
    )
    .await?;
    Ok(())
}

async fn handle_edit(bot: &Bot, msg: &Message, state: &AppState, args: &str) -> Result<()> {
    let (key, patch) = parse_edit_args(args)?;

    if state.store.product_by_key(&key).await?.is_none() {
        bot.send_message(msg.chat.id, "Chave de produto inválida.").await?;
        return Ok(());
    }

    if !patch.is_empty() {
        state.store.update_product(&key, &patch).await?;
    }

    // Re-render the public post from the merged record.
    let Some(product) = state.store.product_by_key(&key).await? else {
        bail!("produto {key} sumiu durante a edição");
    };
    let text = render_product_text(&product.title, product.price_cents, &product.product_key);
    let public = state.config.public_chat_id;
    let message_id = MessageId(product.message_id);

    if let Some(raw) = &product.image_url {
        let url = reqwest::Url::parse(raw)
            .map_err(|_| anyhow!("URL de imagem inválida: '{raw}'"))?;
        let media = InputMedia::Photo(InputMediaPhoto::new(InputFile::url(url)).caption(text));
        bot.edit_message_media(public, message_id, media)
            .reply_markup(buy_keyboard())
            .await?;
    } else {
        bot.edit_message_text(public, message_id, text)
            .reply_markup(buy_keyboard())
            .await?;
    }

    bot.send_message(msg.chat.id, "Produto atualizado com sucesso!")
        .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_command_and_strips_bot_mention() {
        assert_eq!(
            split_command("/criarproduto@loja_bot A | 1 | u"),
            Some(("/criarproduto", "A | 1 | u"))
        );
        assert_eq!(split_command("/start"), Some(("/start", "")));
        assert_eq!(split_command("hello"), None);
    }

    #[test]
    fn parses_create_args_with_and_without_image() {
        let args = parse_create_args("E-book | 49,90 | https://f.test/a.pdf").unwrap();
        assert_eq!(args.title, "E-book");
        assert_eq!(args.price_cents, 4990);
        assert_eq!(args.file_url, "https://f.test/a.pdf");
        assert!(args.image_url.is_none());

        let args =
            parse_create_args("E-book | 49,90 | https://f.test/a.pdf | https://i.test/c.png")
                .unwrap();
        assert_eq!(args.image_url.as_deref(), Some("https://i.test/c.png"));
    }

    #[test]
    fn create_args_require_all_mandatory_fields() {
        assert!(parse_create_args("").is_err());
        assert!(parse_create_args("E-book | 49,90").is_err());
        assert!(parse_create_args("E-book | caro | https://f.test/a.pdf").is_err());
        assert!(parse_create_args(" | 49,90 | https://f.test/a.pdf").is_err());
    }

    #[test]
    fn price_only_edit_leaves_other_fields_untouched() {
        let (key, patch) = parse_edit_args("AB12CD34EF | preco=59,90").unwrap();
        assert_eq!(key, "AB12CD34EF");
        assert_eq!(patch.price_cents, Some(5990));
        assert!(patch.title.is_none());
        assert!(patch.file_url.is_none());
        assert!(patch.image_url.is_none());
    }

    #[test]
    fn edit_args_accept_multiple_fields() {
        let (_, patch) =
            parse_edit_args("K | nome=Novo | arquivo=https://f.test/b.pdf").unwrap();
        assert_eq!(patch.title.as_deref(), Some("Novo"));
        assert_eq!(patch.file_url.as_deref(), Some("https://f.test/b.pdf"));
    }

    #[test]
    fn edit_args_reject_unknown_fields() {
        assert!(parse_edit_args("K | cor=azul").is_err());
        assert!(parse_edit_args("").is_err());
    }

    #[test]
    fn edit_with_key_only_is_an_empty_patch() {
        let (key, patch) = parse_edit_args("AB12CD34EF").unwrap();
        assert_eq!(key, "AB12CD34EF");
        assert!(patch.is_empty());
    }
}
