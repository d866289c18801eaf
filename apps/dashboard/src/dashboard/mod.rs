//! Dashboard assembly: joins store reads, latest-snapshot resolution and
//! equipment parsing into view-models.

pub mod handlers;
pub mod views;

use std::collections::BTreeMap;

use tracing::{debug, info};

use crate::equipment::{parse_loadout, Catalog, RosterTotals, Slot};
use crate::errors::AppError;
use crate::models::snapshot::CharacterRow;
use crate::models::squad::SquadRow;
use crate::models::user::UserRow;
use crate::snapshot::{latest_per_owner, latest_per_owner_where};
use crate::store::GuildSession;

use views::{
    BuildBoard, BuildRowView, CastleBoard, CharacterSummary, EquipmentBoard, EquipmentRowView,
    OrderView, RosterMember, RosterView, SquadListItem, UserView,
};

const UNNAMED_SQUAD: &str = "(unnamed)";

pub async fn list_users(session: &mut dyn GuildSession) -> Result<Vec<UserView>, AppError> {
    let users = session.list_users().await?;
    Ok(users.iter().map(UserView::from).collect())
}

pub async fn list_squads(
    session: &mut dyn GuildSession,
) -> Result<Vec<SquadListItem>, AppError> {
    let squads = session.list_squads().await?;
    Ok(squads
        .into_iter()
        .map(|s| SquadListItem {
            chat_id: s.chat_id,
            name: s.squad_name.unwrap_or_else(|| UNNAMED_SQUAD.to_string()),
            member_count: s.member_count,
            hiring: s.hiring,
        })
        .collect())
}

/// Approved squad members with their current character profile.
pub async fn squad_roster(
    session: &mut dyn GuildSession,
    chat_id: i64,
) -> Result<RosterView, AppError> {
    let squad = load_squad(session, chat_id).await?;
    let users = member_users(session, chat_id).await?;
    let ids: Vec<i64> = users.keys().copied().collect();

    let characters = latest_per_owner(session.characters(Some(&ids[..]), None).await?);
    let totals = RosterTotals::from_characters(characters.values());
    let members = roster_members(&users, &characters);

    info!(
        "Roster for squad {chat_id}: {} members, {} with profiles",
        members.len(),
        totals.members
    );
    Ok(RosterView {
        squad_id: chat_id,
        squad_name: squad_name(&squad),
        members,
        totals,
    })
}

/// Per-member equipment cells resolved from each member's latest loadout.
pub async fn equipment_board(
    session: &mut dyn GuildSession,
    catalog: &Catalog,
    chat_id: i64,
) -> Result<EquipmentBoard, AppError> {
    let squad = load_squad(session, chat_id).await?;
    let users = member_users(session, chat_id).await?;
    let ids: Vec<i64> = users.keys().copied().collect();

    let characters = latest_per_owner(session.characters(Some(&ids[..]), None).await?);
    let equips = latest_per_owner(session.equips(&ids).await?);
    let totals = RosterTotals::from_characters(characters.values());

    let mut rows: Vec<EquipmentRowView> = users
        .values()
        .map(|user| {
            let character = characters.get(&user.id);
            let equip = equips.get(&user.id);
            let cells = parse_loadout(equip.and_then(|e| e.equip.as_deref()), catalog);
            EquipmentRowView {
                user: UserView::from(user),
                level: character.map_or(0, |c| c.level),
                attack: character.map_or(0, |c| c.attack),
                defence: character.map_or(0, |c| c.defence),
                equipped: cells.iter().filter(|c| !c.is_blank()).count(),
                cells,
                reported_at: equip.map(|e| e.date),
            }
        })
        .collect();
    rows.sort_by(|a, b| b.level.cmp(&a.level).then(a.user.id.cmp(&b.user.id)));

    debug!(
        "Equipment board for squad {chat_id}: {} rows, {} loadouts",
        rows.len(),
        equips.len()
    );
    Ok(EquipmentBoard {
        squad_id: chat_id,
        squad_name: squad_name(&squad),
        slots: Slot::ALL.to_vec(),
        rows,
        totals,
    })
}

/// Latest construction report per squad member; members who never reported are omitted.
pub async fn build_board(
    session: &mut dyn GuildSession,
    chat_id: i64,
) -> Result<BuildBoard, AppError> {
    let squad = load_squad(session, chat_id).await?;
    let users = member_users(session, chat_id).await?;
    let ids: Vec<i64> = users.keys().copied().collect();

    let reports = latest_per_owner(session.build_reports(&ids).await?);
    let mut rows: Vec<BuildRowView> = reports
        .into_values()
        .filter_map(|r| {
            users.get(&r.user_id).map(|user| BuildRowView {
                user: UserView::from(user),
                building: r.building,
                progress_percent: r.progress_percent,
                reported_at: r.date,
            })
        })
        .collect();
    rows.sort_by(|a, b| b.reported_at.cmp(&a.reported_at));

    Ok(BuildBoard {
        squad_id: chat_id,
        squad_name: squad_name(&squad),
        rows,
    })
}

/// Latest character per user across all users, optionally restricted to one castle.
///
/// The castle filter selects among snapshots, so a user who left the castle is
/// still listed with their last profile taken there.
pub async fn castle_board(
    session: &mut dyn GuildSession,
    castle: Option<&str>,
) -> Result<CastleBoard, AppError> {
    let snapshots = session.characters(None, castle).await?;
    let characters = match castle {
        Some(castle) => latest_per_owner_where(snapshots, |c: &CharacterRow| {
            c.castle.as_deref() == Some(castle)
        }),
        None => latest_per_owner(snapshots),
    };

    let ids: Vec<i64> = characters.keys().copied().collect();
    let users: BTreeMap<i64, UserRow> = session
        .users_by_ids(&ids)
        .await?
        .into_iter()
        .map(|u| (u.id, u))
        .collect();

    let totals = RosterTotals::from_characters(characters.values());
    let mut members: Vec<RosterMember> = characters
        .values()
        .map(|c| RosterMember {
            user: users
                .get(&c.user_id)
                .map(UserView::from)
                .unwrap_or_else(|| unknown_user(c.user_id)),
            character: Some(CharacterSummary::from(c)),
        })
        .collect();
    sort_members(&mut members);

    Ok(CastleBoard {
        castle: castle.map(str::to_string),
        characters: members,
        totals,
    })
}

pub async fn squad_orders(
    session: &mut dyn GuildSession,
    chat_id: i64,
) -> Result<Vec<OrderView>, AppError> {
    load_squad(session, chat_id).await?;
    let orders = session.orders(chat_id).await?;
    Ok(orders
        .into_iter()
        .map(|o| OrderView {
            id: o.id,
            text: o.text.unwrap_or_default(),
            posted_at: o.date,
            confirmed_count: o.confirmed_count,
        })
        .collect())
}

async fn load_squad(
    session: &mut dyn GuildSession,
    chat_id: i64,
) -> Result<SquadRow, AppError> {
    session
        .squad(chat_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Squad {chat_id} not found")))
}

/// Users behind the approved members of a squad, keyed by user id.
async fn member_users(
    session: &mut dyn GuildSession,
    chat_id: i64,
) -> Result<BTreeMap<i64, UserRow>, AppError> {
    let members = session.squad_members(chat_id).await?;
    let ids: Vec<i64> = members.iter().map(|m| m.user_id).collect();
    if ids.is_empty() {
        return Ok(BTreeMap::new());
    }
    let known: BTreeMap<i64, UserRow> = session
        .users_by_ids(&ids)
        .await?
        .into_iter()
        .map(|u| (u.id, u))
        .collect();
    // members whose user row is missing are still shown, by id
    Ok(ids
        .into_iter()
        .map(|id| {
            let user = known.get(&id).cloned().unwrap_or_else(|| UserRow {
                id,
                username: None,
                first_name: None,
                last_name: None,
                date_added: None,
            });
            (id, user)
        })
        .collect())
}

fn roster_members(
    users: &BTreeMap<i64, UserRow>,
    characters: &BTreeMap<i64, CharacterRow>,
) -> Vec<RosterMember> {
    let mut members: Vec<RosterMember> = users
        .values()
        .map(|user| RosterMember {
            user: UserView::from(user),
            character: characters.get(&user.id).map(CharacterSummary::from),
        })
        .collect();
    sort_members(&mut members);
    members
}

/// Highest level first; members without a profile go last.
fn sort_members(members: &mut [RosterMember]) {
    members.sort_by(|a, b| {
        let la = a.character.as_ref().map(|c| c.level);
        let lb = b.character.as_ref().map(|c| c.level);
        lb.cmp(&la).then(a.user.id.cmp(&b.user.id))
    });
}

fn squad_name(squad: &SquadRow) -> String {
    squad
        .squad_name
        .clone()
        .unwrap_or_else(|| UNNAMED_SQUAD.to_string())
}

fn unknown_user(id: i64) -> UserView {
    UserView {
        id,
        name: String::new(),
        handle: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::order::OrderRow;
    use crate::models::snapshot::{BuildReportRow, EquipRow};
    use crate::models::squad::SquadMemberRow;
    use crate::store::memory::MemoryStore;
    use chrono::{NaiveDate, NaiveDateTime};

    const SQUAD: i64 = -1001;

    fn at(day: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2018, 4, day)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    fn user(id: i64, first: &str) -> UserRow {
        UserRow {
            id,
            username: Some(format!("user{id}")),
            first_name: Some(first.to_string()),
            last_name: None,
            date_added: None,
        }
    }

    fn character(user_id: i64, day: u32, level: i32, castle: &str) -> CharacterRow {
        CharacterRow {
            user_id,
            date: at(day),
            name: Some(format!("hero{user_id}")),
            prof: Some("Рыцарь".to_string()),
            level,
            attack: level * 2,
            defence: level,
            exp: 0,
            castle: Some(castle.to_string()),
            gold: 0,
        }
    }

    fn member(user_id: i64, approved: bool) -> SquadMemberRow {
        SquadMemberRow {
            squad_id: SQUAD,
            user_id,
            approved,
        }
    }

    fn fixture() -> MemoryStore {
        MemoryStore {
            users: vec![user(1, "Аня"), user(2, "Борис"), user(3, "Вера"), user(4, "Гоша")],
            squads: vec![SquadRow {
                chat_id: SQUAD,
                squad_name: Some("Драконы".to_string()),
                invite_link: None,
                thorns_enabled: true,
                hiring: false,
            }],
            members: vec![member(1, true), member(2, true), member(3, true), member(4, false)],
            characters: vec![
                character(1, 1, 5, "red"),
                character(1, 3, 10, "red"),
                character(2, 2, 20, "red"),
                character(3, 1, 33, "blue"),
                character(4, 1, 50, "red"),
            ],
            equips: vec![
                EquipRow {
                    user_id: 1,
                    date: at(1),
                    equip: Some("Меч".to_string()),
                },
                EquipRow {
                    user_id: 1,
                    date: at(2),
                    equip: Some("Хранителя Эльфийский меч\nКинжал триумфа".to_string()),
                },
                EquipRow {
                    user_id: 2,
                    date: at(2),
                    equip: None,
                },
            ],
            build_reports: vec![
                BuildReportRow {
                    user_id: 2,
                    date: at(1),
                    building: Some("Стена".to_string()),
                    progress_percent: 10,
                    report_type: 0,
                },
                BuildReportRow {
                    user_id: 2,
                    date: at(4),
                    building: Some("Ворота".to_string()),
                    progress_percent: 40,
                    report_type: 0,
                },
            ],
            orders: vec![
                OrderRow {
                    id: 1,
                    chat_id: SQUAD,
                    text: Some("Атака!".to_string()),
                    date: at(1),
                    confirmed_count: 2,
                },
                OrderRow {
                    id: 2,
                    chat_id: SQUAD,
                    text: None,
                    date: at(3),
                    confirmed_count: 0,
                },
            ],
            broken: false,
        }
    }

    #[tokio::test]
    async fn test_roster_uses_latest_profile_and_approved_members() {
        let mut store = fixture();
        let roster = squad_roster(&mut store, SQUAD).await.unwrap();

        assert_eq!(roster.squad_name, "Драконы");
        assert_eq!(roster.members.len(), 3);
        // sorted by level, highest first
        let levels: Vec<_> = roster
            .members
            .iter()
            .map(|m| m.character.as_ref().unwrap().level)
            .collect();
        assert_eq!(levels, [33, 20, 10]);
        assert_eq!(roster.totals.members, 3);
        assert!((roster.totals.average_level - 21.0).abs() < f64::EPSILON);
        assert_eq!(roster.totals.attack, 126);
    }

    #[tokio::test]
    async fn test_roster_unknown_squad_is_not_found() {
        let mut store = fixture();
        let err = squad_roster(&mut store, 42).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_empty_roster_has_zero_average() {
        let mut store = fixture();
        store.members.clear();
        let roster = squad_roster(&mut store, SQUAD).await.unwrap();
        assert!(roster.members.is_empty());
        assert_eq!(roster.totals.average_level, 0.0);
    }

    #[tokio::test]
    async fn test_member_without_profile_is_listed_last() {
        let mut store = fixture();
        store.characters.retain(|c| c.user_id != 2);
        let roster = squad_roster(&mut store, SQUAD).await.unwrap();
        assert_eq!(roster.members.len(), 3);
        assert_eq!(roster.members[2].user.id, 2);
        assert!(roster.members[2].character.is_none());
        assert_eq!(roster.totals.members, 2);
    }

    #[tokio::test]
    async fn test_equipment_board_parses_latest_loadout() {
        let mut store = fixture();
        let board = equipment_board(&mut store, &Catalog::builtin(), SQUAD).await.unwrap();

        assert_eq!(board.slots, Slot::ALL);
        assert_eq!(board.rows.len(), 3);
        for row in &board.rows {
            assert_eq!(row.cells.len(), Slot::ALL.len());
        }

        let anya = board.rows.iter().find(|r| r.user.id == 1).unwrap();
        assert_eq!(anya.cells[0].text, "Хранителя Эльфийский меч");
        assert_eq!(anya.cells[0].color.as_deref(), Some("green"));
        assert_eq!(anya.cells[1].text, "Триумф");
        assert_eq!(anya.reported_at, Some(at(2)));
        assert_eq!(anya.equipped, 2);

        let boris = board.rows.iter().find(|r| r.user.id == 2).unwrap();
        assert!(boris.cells.iter().all(|c| c.is_blank()));
        assert_eq!(boris.equipped, 0);

        let vera = board.rows.iter().find(|r| r.user.id == 3).unwrap();
        assert!(vera.cells.iter().all(|c| c.is_blank()));
        assert_eq!(vera.reported_at, None);
    }

    #[tokio::test]
    async fn test_build_board_latest_report_only() {
        let mut store = fixture();
        let board = build_board(&mut store, SQUAD).await.unwrap();
        assert_eq!(board.rows.len(), 1);
        assert_eq!(board.rows[0].building.as_deref(), Some("Ворота"));
        assert_eq!(board.rows[0].progress_percent, 40);
    }

    #[tokio::test]
    async fn test_castle_board_filters_snapshots() {
        let mut store = fixture();
        // user 3 moved from red to blue; their last red profile counts
        store.characters.push(character(3, 2, 30, "red"));
        let board = castle_board(&mut store, Some("red")).await.unwrap();

        let ids: Vec<_> = board.characters.iter().map(|m| m.user.id).collect();
        assert_eq!(ids, [4, 3, 2, 1]);
        let vera = &board.characters[1];
        assert_eq!(vera.character.as_ref().unwrap().level, 30);
        assert_eq!(board.castle.as_deref(), Some("red"));
    }

    #[tokio::test]
    async fn test_character_reads_are_narrowed_to_castle() {
        let mut store = fixture();
        let red = store.characters(None, Some("red")).await.unwrap();
        assert_eq!(red.len(), 4);
        assert!(red.iter().all(|c| c.castle.as_deref() == Some("red")));

        let squad_red = store.characters(Some(&[1, 3][..]), Some("red")).await.unwrap();
        assert!(squad_red.iter().all(|c| c.user_id == 1));
        assert_eq!(squad_red.len(), 2);
    }

    #[tokio::test]
    async fn test_castle_board_without_filter() {
        let mut store = fixture();
        let board = castle_board(&mut store, None).await.unwrap();
        assert_eq!(board.characters.len(), 4);
        assert_eq!(board.totals.total_level, 10 + 20 + 33 + 50);
    }

    #[tokio::test]
    async fn test_castle_board_unknown_castle_is_empty() {
        let mut store = fixture();
        let board = castle_board(&mut store, Some("green")).await.unwrap();
        assert!(board.characters.is_empty());
        assert_eq!(board.totals.average_level, 0.0);
    }

    #[tokio::test]
    async fn test_orders_newest_first() {
        let mut store = fixture();
        let orders = squad_orders(&mut store, SQUAD).await.unwrap();
        assert_eq!(orders.len(), 2);
        assert_eq!(orders[0].id, 2);
        assert_eq!(orders[0].text, "");
        assert_eq!(orders[1].confirmed_count, 2);
    }

    #[tokio::test]
    async fn test_squad_list_counts_approved() {
        let mut store = fixture();
        let squads = list_squads(&mut store).await.unwrap();
        assert_eq!(squads.len(), 1);
        assert_eq!(squads[0].member_count, 3);
    }

    #[tokio::test]
    async fn test_users_listing() {
        let mut store = fixture();
        let users = list_users(&mut store).await.unwrap();
        assert_eq!(users.len(), 4);
        assert_eq!(users[0].name, "Аня");
        assert_eq!(users[0].handle.as_deref(), Some("@user1"));
    }

    #[tokio::test]
    async fn test_store_failure_surfaces_as_database_error() {
        let mut store = fixture();
        store.broken = true;
        let err = equipment_board(&mut store, &Catalog::builtin(), SQUAD).await.unwrap_err();
        assert!(matches!(err, AppError::Database(_)));
    }
}
