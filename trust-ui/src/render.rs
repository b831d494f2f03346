//! Rendering layer
//!
//! Pure functions from entity state to markup fragments. Every user-authored
//! field (project name, currency, comment, private link, track titles) is
//! escaped here; stored values stay raw so repeated edits never accumulate
//! entities. No business logic and no store access.

use trust_common::db::models::{Artist, Role, Track, Trend, User};

/// Escape text for element content.
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            _ => out.push(c),
        }
    }
    out
}

/// Escape text for attribute values (newlines collapse to spaces).
pub fn escape_attr(s: &str) -> String {
    escape_html(s).replace('\n', " ")
}

fn clamp_hp(hp: i64) -> i64 {
    hp.clamp(0, 100)
}

/// Fixed 100-segment HP bar; fill is the clamped [0,100] value.
pub fn hp_bar(hp: i64) -> String {
    let on = clamp_hp(hp);
    let mut bits = String::with_capacity(100 * 24);
    for i in 0..100 {
        if i < on {
            bits.push_str(r#"<div class="hpBit on"></div>"#);
        } else {
            bits.push_str(r#"<div class="hpBit"></div>"#);
        }
    }
    format!(r#"<div class="hpWrap">{}</div>"#, bits)
}

pub fn trend_glyph(trend: Trend) -> &'static str {
    match trend {
        Trend::Up => "▲",
        Trend::Down => "▼",
        Trend::Flat => "▬",
    }
}

pub fn trend_class(trend: Trend) -> &'static str {
    match trend {
        Trend::Up => "up",
        Trend::Down => "down",
        Trend::Flat => "flat",
    }
}

fn role_label(role: Role) -> &'static str {
    match role {
        Role::Fan => "FAN",
        Role::Artist => "ARTIST",
    }
}

/// Viewer's own (level, hp): artist profile counters for artists, fan
/// counters otherwise.
fn viewer_stats(user: &User, my_artist: Option<&Artist>) -> (i64, i64) {
    match user.role {
        Role::Artist => my_artist.map(|a| (a.level, a.hp)).unwrap_or((1, 0)),
        Role::Fan => (user.fan_level, user.fan_hp),
    }
}

/// One-time role picker shown when no user row exists yet.
pub fn onboarding_card() -> String {
    r#"<div class="card">
  <div class="h1">Who are you today? 📟</div>
  <div class="muted small" style="margin-top:6px">
    TRUST is a game of trust. Artists grow like assets. HP is your life bar. Levels go X1, X2…
  </div>
  <div class="hr"></div>
  <div class="row" style="gap:10px; flex-wrap:wrap">
    <button class="btn primary" data-pick-role="fan">🎧 Fan</button>
    <button class="btn hot" data-pick-role="artist">🎤 Artist</button>
  </div>
  <div class="hr"></div>
  <div class="small muted">(Your role is saved. You can change it later in Profile.)</div>
</div>"#
        .to_string()
}

/// Trust chart tab: viewer status card plus ranked asset rows.
pub fn trust_tab(user: &User, my_artist: Option<&Artist>, artists: &[Artist]) -> String {
    let (level, hp) = viewer_stats(user, my_artist);
    let rows: String = artists.iter().map(asset_row).collect();

    format!(
        r#"<div class="card">
  <div class="row">
    <div>
      <div class="h1">TRUST Chart</div>
      <div class="small muted">like a crypto wallet, but the coins are artists.</div>
    </div>
    <div class="pixelTag">X{level} • HP {hp}/100</div>
  </div>
  <div style="margin-top:10px">{bar}</div>
  <div class="hr"></div>
  <div class="row" style="gap:10px; flex-wrap:wrap">
    <button class="btn" data-refresh>🔄 Refresh</button>
    <button class="btn ghost" data-hint>🕹 How to play</button>
  </div>
</div>
{rows}"#,
        level = level,
        hp = clamp_hp(hp),
        bar = hp_bar(hp),
        rows = rows,
    )
}

/// One chart row; click opens the artist detail modal.
pub fn asset_row(artist: &Artist) -> String {
    let subtitle = format!(
        "{} • {}",
        artist.currency_name,
        if artist.comment.is_empty() {
            "no description"
        } else {
            &artist.comment
        }
    );
    let cls = trend_class(artist.trend);
    let delta = match artist.trend {
        Trend::Flat => "0%",
        Trend::Up => "+?",
        Trend::Down => "-?",
    };

    format!(
        r#"<div class="card" style="padding:10px">
  <div class="asset" data-artist="{id}">
    <div class="badge">{glyph}</div>
    <div class="tnames">
      <b>{name} <span class="muted">({currency})</span></b>
      <span>{subtitle}</span>
    </div>
    <div class="right">
      <div class="kpi">{score}</div>
      <div class="delta {cls}">{delta}</div>
    </div>
  </div>
</div>"#,
        id = escape_attr(&artist.id),
        glyph = trend_glyph(artist.trend),
        name = escape_html(&artist.project_name),
        currency = escape_html(&artist.currency_name),
        subtitle = escape_html(&subtitle),
        score = artist.trust_score,
        cls = cls,
        delta = delta,
    )
}

/// Growth feed tab: viewer status plus the cached chart top.
pub fn growth_tab(user: &User, my_artist: Option<&Artist>, top: &[Artist]) -> String {
    let (level, _) = viewer_stats(user, my_artist);
    let feed: String = top
        .iter()
        .map(|a| {
            let delta = match a.trend {
                Trend::Up => "rising",
                Trend::Down => "falling",
                Trend::Flat => "steady",
            };
            format!(
                r#"<div class="asset" data-artist="{id}">
  <div class="badge">{glyph}</div>
  <div class="tnames">
    <b>{name}</b>
    <span>{comment}</span>
  </div>
  <div class="right">
    <div class="kpi">{score}</div>
    <div class="delta {cls}">{delta}</div>
  </div>
</div>"#,
                id = escape_attr(&a.id),
                glyph = trend_glyph(a.trend),
                name = escape_html(&a.project_name),
                comment = escape_html(if a.comment.is_empty() { "…" } else { &a.comment }),
                score = a.trust_score,
                cls = trend_class(a.trend),
                delta = delta,
            )
        })
        .collect();

    format!(
        r#"<div class="card">
  <div class="h1">Growth / Feed</div>
  <div class="small muted">who is rising, who is falling, what to do about it.</div>
  <div class="hr"></div>
  <div class="small">Your status:</div>
  <div style="margin-top:8px">
    <div class="pixelTag">{role} • X{level}</div>
  </div>
</div>
<div class="card">
  <div class="h2">On top right now</div>
  <div class="hr"></div>
  <div style="display:flex; flex-direction:column; gap:10px">{feed}</div>
</div>"#,
        role = role_label(user.role),
        level = level,
        feed = feed,
    )
}

/// Profile tab: status card plus the role-specific panel.
pub fn profile_tab(user: &User, my_artist: Option<&Artist>) -> String {
    let (level, hp) = viewer_stats(user, my_artist);
    let panel = match user.role {
        Role::Artist => artist_editor(my_artist),
        Role::Fan => fan_panel(user),
    };

    format!(
        r#"<div class="card">
  <div class="h1">My profile</div>
  <div class="small muted">Editing happens only here.</div>
  <div class="hr"></div>
  <div class="row">
    <div class="pixelTag">role: {role}</div>
    <button class="btn" data-switch-role>♻ switch role</button>
  </div>
  <div style="margin-top:10px">{bar}</div>
  <div class="row" style="margin-top:10px">
    <div class="pixelTag">X{level}</div>
    <div class="pixelTag">★ {stars}</div>
    <div class="pixelTag">Entry: {entry}</div>
  </div>
</div>
{panel}"#,
        role = role_label(user.role),
        bar = hp_bar(hp),
        level = level,
        stars = user.stars_balance,
        entry = if user.entry_active { "active" } else { "stub" },
        panel = panel,
    )
}

fn fan_panel(user: &User) -> String {
    format!(
        r#"<div class="card">
  <div class="h2">Fan panel</div>
  <div class="small muted">Fans level up too: back the risers, earn bonuses (later).</div>
  <div class="hr"></div>
  <div class="row">
    <div class="pixelTag">Fan Trust: X{level}</div>
    <div class="pixelTag">HP {hp}/100</div>
  </div>
</div>"#,
        level = user.fan_level,
        hp = clamp_hp(user.fan_hp),
    )
}

fn artist_editor(my_artist: Option<&Artist>) -> String {
    let (project, currency, comment, link) = my_artist
        .map(|a| {
            (
                escape_attr(&a.project_name),
                escape_attr(&a.currency_name),
                escape_attr(&a.comment),
                escape_attr(&a.private_link),
            )
        })
        .unwrap_or_default();

    format!(
        r#"<div class="card">
  <div class="h2">Artist profile</div>
  <div class="small muted">Name ≤10 characters. Currency ≤10. Keep the pitch short.</div>
  <div class="hr"></div>
  <div class="grid2">
    <div>
      <div class="small muted">Project name</div>
      <input class="input" id="inProject" maxlength="10" value="{project}" />
    </div>
    <div>
      <div class="small muted">Currency</div>
      <input class="input" id="inCurrency" maxlength="10" value="{currency}" />
    </div>
  </div>
  <div style="margin-top:10px">
    <div class="small muted">Comment (short)</div>
    <input class="input" id="inComment" maxlength="60" value="{comment}" />
  </div>
  <div style="margin-top:10px">
    <div class="small muted">Private community link</div>
    <input class="input" id="inPrivate" placeholder="https://t.me/..." value="{link}" />
  </div>
  <div class="hr"></div>
  <button class="btn primary" data-save-artist>💾 Save</button>
  <div class="hr"></div>
  <div class="small muted">
    Demo tracks are seeded into the <b>tracks</b> table out-of-band for now.
  </div>
</div>"#,
    )
}

/// Artist detail modal: stats, actions, links block and tracks block.
pub fn artist_modal(
    artist: &Artist,
    is_owner: bool,
    has_demo: bool,
    tracks: &[Track],
    demo_price_stars: i64,
) -> String {
    let demo_button = if has_demo {
        "🎧 Demo unlocked".to_string()
    } else {
        format!("🔒 Unlock demo ({demo_price_stars}★)")
    };
    let tracks_block = if has_demo {
        tracks_block(tracks)
    } else {
        r#"<div class="muted small">🔒 Unlock the demo to listen right here.</div>"#.to_string()
    };

    format!(
        r#"<div class="sheetHeader">
  <div>
    <div class="h1">{name} <span class="muted">({currency})</span></div>
    <div class="small muted">{comment}</div>
  </div>
  <button class="close" data-close>✕</button>
</div>
<div class="card">
  <div class="row">
    <div class="pixelTag">X{level} • HP {hp}/100</div>
    <div class="pixelTag">TRUST {score}</div>
  </div>
  <div style="margin-top:10px">{bar}</div>
  <div class="hr"></div>
  <div class="grid2">
    <button class="btn primary" data-support="{id}">🔥 Support (+1)</button>
    <button class="btn hot" data-unlock="{id}" data-unlocked="{unlocked}">{demo_button}</button>
  </div>
  <div class="hr"></div>
  <div class="small muted">
    Support drives growth. The demo unlocks separately for {demo_price_stars}★.
  </div>
</div>
<div class="card">
  <div class="h2">Links</div>
  {links}
</div>
<div class="card">
  <div class="h2">Demo tracks</div>
  {tracks_block}
</div>"#,
        name = escape_html(&artist.project_name),
        currency = escape_html(&artist.currency_name),
        comment = escape_html(if artist.comment.is_empty() { "…" } else { &artist.comment }),
        level = artist.level,
        hp = clamp_hp(artist.hp),
        score = artist.trust_score,
        bar = hp_bar(artist.hp),
        id = escape_attr(&artist.id),
        unlocked = has_demo,
        demo_button = demo_button,
        links = links_block(artist, is_owner || has_demo),
        tracks_block = tracks_block,
    )
}

fn links_block(artist: &Artist, show_private: bool) -> String {
    let link = artist.private_link.trim();
    let body = if show_private && !link.is_empty() {
        format!(
            r#"<a href="{}" target="_blank">🔗 Open the private channel</a>"#,
            escape_attr(link)
        )
    } else {
        r#"<span class="muted small">🔒 Link hidden (unlocks with the demo)</span>"#.to_string()
    };

    format!(
        r#"<div class="small muted">Private community:</div>
<div style="margin-top:8px">{}</div>"#,
        body
    )
}

fn tracks_block(tracks: &[Track]) -> String {
    if tracks.is_empty() {
        return r#"<div class="muted small">No demos uploaded yet.</div>"#.to_string();
    }

    let rows: String = tracks
        .iter()
        .map(|t| {
            format!(
                r#"<div class="asset" style="cursor:default">
  <div class="badge">🎵</div>
  <div class="tnames">
    <b>{title}</b>
    <span class="muted">listen inside TRUST</span>
  </div>
  <div class="right" style="display:flex; gap:8px; justify-content:flex-end">
    <button class="btn" data-track="{id}">▶︎</button>
    <button class="btn" data-stop>⏹</button>
  </div>
</div>"#,
                title = escape_html(&t.title),
                id = escape_attr(&t.id),
            )
        })
        .collect();

    format!(
        r#"<div style="display:flex; flex-direction:column; gap:10px; margin-top:10px">
{rows}
<audio id="audioPlayer" controls style="width:100%; margin-top:10px; display:none;"></audio>
<div class="small muted" id="audioHint"></div>
</div>"#,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn artist() -> Artist {
        Artist {
            id: "artist-1".to_string(),
            user_id: "user-1".to_string(),
            project_name: "NEW".to_string(),
            currency_name: "MANTA".to_string(),
            comment: "short pitch".to_string(),
            private_link: "https://t.me/secret".to_string(),
            trust_score: 10,
            level: 1,
            hp: 20,
            votes_total: 0,
            supporters_count: 0,
            trend: Trend::Flat,
            last_activity_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn user(role: Role) -> User {
        User {
            id: "user-1".to_string(),
            telegram_id: "100".to_string(),
            username: None,
            first_name: None,
            last_name: None,
            role,
            fan_level: 1,
            fan_hp: 15,
            stars_balance: 0,
            entry_active: false,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_escape_html_all_specials() {
        assert_eq!(
            escape_html(r#"<b>&"'</b>"#),
            "&lt;b&gt;&amp;&quot;&#039;&lt;/b&gt;"
        );
    }

    #[test]
    fn test_escape_is_not_idempotent_on_entities() {
        // Escaping escapes raw text exactly once; the raw value is what is
        // stored, so re-rendering the stored value never double-escapes.
        assert_eq!(escape_html("&amp;"), "&amp;amp;");
        assert_eq!(escape_html("&"), "&amp;");
    }

    #[test]
    fn test_escape_attr_collapses_newlines() {
        assert_eq!(escape_attr("a\nb"), "a b");
    }

    #[test]
    fn test_hp_bar_fill_and_clamp() {
        let bar = hp_bar(20);
        assert_eq!(bar.matches("hpBit on").count(), 20);
        assert_eq!(bar.matches("hpBit").count(), 100);

        // Out-of-range values clamp to [0,100]
        assert_eq!(hp_bar(250).matches("hpBit on").count(), 100);
        assert_eq!(hp_bar(-5).matches("hpBit on").count(), 0);
    }

    #[test]
    fn test_trend_glyphs_fixed() {
        assert_eq!(trend_glyph(Trend::Up), "▲");
        assert_eq!(trend_glyph(Trend::Down), "▼");
        assert_eq!(trend_glyph(Trend::Flat), "▬");
        assert_eq!(trend_class(Trend::Up), "up");
        assert_eq!(trend_class(Trend::Flat), "flat");
    }

    #[test]
    fn test_modal_hides_private_content_without_access() {
        let a = artist();
        let html = artist_modal(&a, false, false, &[], 100);
        assert!(html.contains("Link hidden"));
        assert!(!html.contains("https://t.me/secret"));
        assert!(html.contains("Unlock demo (100★)"));
        assert!(html.contains("Unlock the demo to listen"));
    }

    #[test]
    fn test_modal_shows_private_content_with_purchase() {
        let a = artist();
        let tracks = vec![Track {
            id: "t1".to_string(),
            artist_id: a.id.clone(),
            title: "First demo".to_string(),
            storage_path: "demo/first.mp3".to_string(),
            created_at: Utc::now(),
        }];
        let html = artist_modal(&a, false, true, &tracks, 100);
        assert!(html.contains("https://t.me/secret"));
        assert!(html.contains("First demo"));
        assert!(html.contains("Demo unlocked"));
    }

    #[test]
    fn test_modal_owner_sees_own_content() {
        let a = artist();
        let html = artist_modal(&a, true, false, &[], 100);
        assert!(html.contains("https://t.me/secret"));
    }

    #[test]
    fn test_user_text_escaped_in_chart_row() {
        let mut a = artist();
        a.project_name = "<script>x</script>".to_string();
        let row = asset_row(&a);
        assert!(!row.contains("<script>"));
        assert!(row.contains("&lt;script&gt;"));
    }

    #[test]
    fn test_editor_roundtrips_raw_value() {
        let mut a = artist();
        a.project_name = "A&B".to_string();
        let html = profile_tab(&user(Role::Artist), Some(&a));
        // Attribute holds the escaped form of the raw value
        assert!(html.contains(r#"value="A&amp;B""#));
    }

    #[test]
    fn test_profile_tab_is_role_exhaustive() {
        let fan_html = profile_tab(&user(Role::Fan), None);
        assert!(fan_html.contains("Fan panel"));
        assert!(!fan_html.contains("Artist profile"));

        let a = artist();
        let artist_html = profile_tab(&user(Role::Artist), Some(&a));
        assert!(artist_html.contains("Artist profile"));
        assert!(!artist_html.contains("Fan panel"));
    }
}
