//! Hand-arranged tables exercising the turn rules end to end.

use std::cell::Cell;
use std::rc::Rc;

use uno_engine::agents::{Agent, GreedyAgent, PolicyAgent, ScriptedAgent};
use uno_engine::cards::{Card, Color, Rank};
use uno_engine::core::{
    Deal, Direction, DrawRule, ExhaustionRule, GameState, Move, PendingEffect, Phase, PlayerId, RuleConfig,
    StackingRule, TurnEvent, UnoError,
};
use uno_engine::rules::{GameOutcome, TerminalReason};

fn card(color: Color, rank: Rank) -> Card {
    Card::new(color, rank).unwrap()
}

fn num(color: Color, n: u8) -> Card {
    card(color, Rank::Number(n))
}

fn p(id: u8) -> PlayerId {
    PlayerId::new(id)
}

fn events(state: &GameState) -> Vec<(PlayerId, TurnEvent)> {
    state.history().iter().map(|r| (r.player, r.event.clone())).collect()
}

#[test]
fn test_standard_deal_leaves_79_cards() {
    let state = GameState::new(RuleConfig::new(4), 2024).unwrap();

    assert_eq!(state.deck().len(), 79);
    assert_eq!(state.discard().len(), 1);
    let in_hands: usize = state.hand_sizes().values().sum();
    assert_eq!(in_hands, 28);
    assert_eq!(state.all_cards().count(), 108);
}

#[test]
fn test_last_card_wins_without_another_decision() {
    let deal = Deal::new(num(Color::Red, 0))
        .with_hand([num(Color::Red, 5)])
        .with_hand([num(Color::Red, 1), num(Color::Red, 2)])
        .with_draw_pile([num(Color::Blue, 1), num(Color::Blue, 2)]);
    let mut state = GameState::from_deal(RuleConfig::new(2), deal, 0).unwrap();

    let calls = Rc::new(Cell::new(0));
    let counter = |calls: Rc<Cell<usize>>| {
        PolicyAgent::new("counting", move |_view, legal: &[Move]| {
            calls.set(calls.get() + 1);
            legal[0]
        })
    };
    let mut agents: Vec<Box<dyn Agent>> = vec![
        Box::new(counter(Rc::clone(&calls))),
        Box::new(counter(Rc::clone(&calls))),
    ];

    state.step(&mut agents).unwrap();

    assert_eq!(state.outcome(), Some(GameOutcome::winner(p(0))));
    assert!(state.is_terminal());
    assert_eq!(calls.get(), 1);

    assert_eq!(state.step(&mut agents).unwrap_err(), UnoError::GameOver);
    assert_eq!(calls.get(), 1);
}

#[test]
fn test_draw_two_without_stacking() {
    let deal = Deal::new(num(Color::Red, 0))
        .with_hand([card(Color::Red, Rank::DrawTwo), num(Color::Blue, 1)])
        .with_hand([num(Color::Green, 3), num(Color::Green, 4)])
        .with_hand([num(Color::Red, 7), num(Color::Yellow, 9)])
        .with_draw_pile([num(Color::Yellow, 1), num(Color::Yellow, 2), num(Color::Yellow, 3)]);
    let mut state = GameState::from_deal(RuleConfig::new(3), deal, 0).unwrap();

    state.apply_move(p(0), Move::play(card(Color::Red, Rank::DrawTwo))).unwrap();

    assert_eq!(state.hand(p(1)).len(), 4);
    assert_eq!(&state.hand(p(1))[2..], &[num(Color::Yellow, 3), num(Color::Yellow, 2)]);
    assert_eq!(state.deck().len(), 1);
    assert_eq!(state.active_player(), p(2));
    assert_eq!(state.pending(), PendingEffect::None);
    assert_eq!(state.turns_played(), 1);

    let penalties: Vec<_> = events(&state)
        .into_iter()
        .filter(|(_, event)| matches!(event, TurnEvent::PenaltyDrawn { .. }))
        .collect();
    assert_eq!(penalties, vec![(p(1), TurnEvent::PenaltyDrawn { count: 2 })]);
}

#[test]
fn test_skip_passes_over_next_player() {
    let deal = Deal::new(num(Color::Green, 0))
        .with_hand([card(Color::Green, Rank::Skip), num(Color::Blue, 1)])
        .with_hand([num(Color::Green, 3)])
        .with_hand([num(Color::Green, 4)]);
    let mut state = GameState::from_deal(RuleConfig::new(3), deal, 0).unwrap();

    state.apply_move(p(0), Move::play(card(Color::Green, Rank::Skip))).unwrap();

    assert_eq!(state.active_player(), p(2));
    assert_eq!(state.history().back().map(|r| (r.player, r.event.clone())), Some((p(1), TurnEvent::Skipped)));
}

#[test]
fn test_reverse_changes_direction() {
    let deal = Deal::new(num(Color::Blue, 0))
        .with_hand([card(Color::Blue, Rank::Reverse), num(Color::Blue, 1)])
        .with_hand([num(Color::Yellow, 3)])
        .with_hand([num(Color::Yellow, 4)])
        .with_hand([num(Color::Yellow, 5)]);
    let mut state = GameState::from_deal(RuleConfig::new(4), deal, 0).unwrap();

    state.apply_move(p(0), Move::play(card(Color::Blue, Rank::Reverse))).unwrap();

    assert_eq!(state.direction(), Direction::CounterClockwise);
    assert_eq!(state.active_player(), p(3));
}

#[test]
fn test_two_player_reverse_acts_as_skip() {
    let table = || {
        Deal::new(num(Color::Red, 0))
            .with_hand([card(Color::Red, Rank::Reverse), num(Color::Red, 1)])
            .with_hand([num(Color::Blue, 2), num(Color::Blue, 3)])
    };
    let reverse = Move::play(card(Color::Red, Rank::Reverse));

    let mut state = GameState::from_deal(RuleConfig::new(2), table(), 0).unwrap();
    state.apply_move(p(0), reverse).unwrap();
    assert_eq!(state.active_player(), p(0));
    assert!(events(&state).contains(&(p(1), TurnEvent::Skipped)));

    let plain = RuleConfig::new(2).with_two_player_reverse_skips(false);
    let mut state = GameState::from_deal(plain, table(), 0).unwrap();
    state.apply_move(p(0), reverse).unwrap();
    assert_eq!(state.active_player(), p(1));
}

#[test]
fn test_stacked_draws_accumulate() {
    let deal = Deal::new(num(Color::Red, 0))
        .with_hand([card(Color::Red, Rank::DrawTwo), num(Color::Red, 1)])
        .with_hand([card(Color::Blue, Rank::DrawTwo), num(Color::Red, 5)])
        .with_hand([num(Color::Green, 7), num(Color::Green, 8)])
        .with_draw_pile((1..=6).map(|n| num(Color::Yellow, n)));
    let config = RuleConfig::new(3).with_stacking(StackingRule::SameRank);
    let mut state = GameState::from_deal(config, deal, 0).unwrap();

    state.apply_move(p(0), Move::play(card(Color::Red, Rank::DrawTwo))).unwrap();
    assert_eq!(state.pending(), PendingEffect::Draw { amount: 2 });
    assert_eq!(state.active_player(), p(1));

    // Only the stack answers a pending penalty, not the matching Red 5.
    assert_eq!(state.legal_moves(), vec![Move::play(card(Color::Blue, Rank::DrawTwo))]);
    state.apply_move(p(1), Move::play(card(Color::Blue, Rank::DrawTwo))).unwrap();
    assert_eq!(state.pending(), PendingEffect::Draw { amount: 4 });

    assert!(state.legal_moves().is_empty());
    state.draw_for_turn(p(2)).unwrap();

    assert_eq!(state.hand(p(2)).len(), 6);
    assert_eq!(state.pending(), PendingEffect::None);
    assert_eq!(state.active_player(), p(0));
    assert_eq!(state.history().back().map(|r| r.event.clone()), Some(TurnEvent::PenaltyDrawn { count: 4 }));
}

#[test]
fn test_exhausted_deck_ends_in_draw() {
    let deal = Deal::new(num(Color::Yellow, 5))
        .with_hand([num(Color::Red, 1), num(Color::Red, 2)])
        .with_hand([num(Color::Blue, 3), num(Color::Blue, 4)]);

    let mut state = GameState::from_deal(RuleConfig::new(2), deal.clone(), 0).unwrap();
    state.draw_for_turn(p(0)).unwrap();
    assert_eq!(state.outcome(), Some(GameOutcome::no_winner(TerminalReason::DeckExhausted)));

    let strict = RuleConfig::new(2).with_exhaustion(ExhaustionRule::Error);
    let mut state = GameState::from_deal(strict, deal, 0).unwrap();
    let err = state.draw_for_turn(p(0)).unwrap_err();
    assert_eq!(err, UnoError::DeckExhausted { requested: 1, available: 0 });
    assert!(!state.is_terminal());
    assert_eq!(state.hand(p(0)).len(), 2);
}

#[test]
fn test_draw_refills_from_discard() {
    let deal = Deal::new(num(Color::Red, 0))
        .with_hand([num(Color::Red, 1), num(Color::Blue, 7)])
        .with_hand([num(Color::Red, 2), num(Color::Yellow, 8)]);
    let mut state = GameState::from_deal(RuleConfig::new(2), deal, 3).unwrap();

    state.apply_move(p(0), Move::play(num(Color::Red, 1))).unwrap();
    state.apply_move(p(1), Move::play(num(Color::Red, 2))).unwrap();
    assert_eq!(state.discard().len(), 3);

    state.draw_for_turn(p(0)).unwrap();

    assert_eq!(state.discard().len(), 1);
    assert_eq!(state.top_card(), num(Color::Red, 2));
    assert_eq!(state.deck().len(), 1);
    assert_eq!(state.all_cards().count(), 5);
    // Either recycled card is red, so it may be played at once.
    assert!(matches!(state.phase(), Phase::Drawing { .. }));
}

#[test]
fn test_turn_limit_ends_game() {
    let deal = Deal::new(num(Color::Red, 0))
        .with_hand([num(Color::Red, 1), num(Color::Red, 2)])
        .with_hand([num(Color::Red, 3), num(Color::Red, 4)]);
    let config = RuleConfig::new(2).with_turn_limit(1);
    let mut state = GameState::from_deal(config, deal, 0).unwrap();

    state.apply_move(p(0), Move::play(num(Color::Red, 1))).unwrap();

    assert_eq!(state.outcome(), Some(GameOutcome::no_winner(TerminalReason::TurnLimit)));
    let err = state.apply_move(p(1), Move::play(num(Color::Red, 3))).unwrap_err();
    assert_eq!(err, UnoError::GameOver);
}

#[test]
fn test_illegal_move_leaves_state_untouched() {
    let deal = Deal::new(num(Color::Red, 0))
        .with_hand([num(Color::Blue, 9), num(Color::Red, 1), Card::wild()])
        .with_hand([num(Color::Red, 3)]);
    let mut state = GameState::from_deal(RuleConfig::new(2), deal, 0).unwrap();
    let hand_before = state.hand(p(0)).to_vec();

    let err = state.apply_move(p(0), Move::play(num(Color::Blue, 9))).unwrap_err();
    assert_eq!(err, UnoError::IllegalMove { player: p(0), mv: Move::play(num(Color::Blue, 9)) });

    // A wild needs a declared color.
    let err = state.apply_move(p(0), Move::play(Card::wild())).unwrap_err();
    assert!(matches!(err, UnoError::IllegalMove { .. }));

    assert_eq!(state.hand(p(0)), hand_before.as_slice());
    assert_eq!(state.top_card(), num(Color::Red, 0));
    assert!(state.history().is_empty());
    assert_eq!(state.active_player(), p(0));
}

#[test]
fn test_only_active_player_may_act() {
    let deal = Deal::new(num(Color::Red, 0))
        .with_hand([num(Color::Red, 1)])
        .with_hand([num(Color::Red, 3)]);
    let mut state = GameState::from_deal(RuleConfig::new(2), deal, 0).unwrap();

    let err = state.apply_move(p(1), Move::play(num(Color::Red, 3))).unwrap_err();
    assert_eq!(err, UnoError::NotYourTurn { player: p(1), active: p(0) });

    let err = state.draw_for_turn(p(0)).unwrap_err();
    assert_eq!(err, UnoError::DrawNotAllowed { player: p(0) });
}

#[test]
fn test_wild_sets_declared_color() {
    let deal = Deal::new(num(Color::Blue, 0))
        .with_hand([Card::wild(), num(Color::Red, 1)])
        .with_hand([num(Color::Green, 5), num(Color::Blue, 6)]);
    let mut state = GameState::from_deal(RuleConfig::new(2), deal, 0).unwrap();

    let wild_moves = state.legal_moves().into_iter().filter(|mv| mv.card.is_wild()).count();
    assert_eq!(wild_moves, 4);

    state.apply_move(p(0), Move::wild(Card::wild(), Color::Green)).unwrap();

    assert_eq!(state.active_color(), Color::Green);
    assert_eq!(state.legal_moves(), vec![Move::play(num(Color::Green, 5))]);
}

#[test]
fn test_agent_must_answer_from_legal_set() {
    let deal = Deal::new(num(Color::Red, 0))
        .with_hand([num(Color::Blue, 9), num(Color::Red, 1)])
        .with_hand([num(Color::Red, 3)]);
    let mut state = GameState::from_deal(RuleConfig::new(2), deal, 0).unwrap();

    let cheat = Move::play(num(Color::Blue, 9));
    let mut agents: Vec<Box<dyn Agent>> = vec![
        Box::new(ScriptedAgent::new([cheat]).with_name("cheater")),
        Box::new(GreedyAgent::new()),
    ];

    let err = state.step(&mut agents).unwrap_err();
    assert_eq!(
        err,
        UnoError::InvalidAgentResponse {
            player: p(0),
            agent: "cheater".to_string(),
            mv: cheat,
        }
    );
    assert_eq!(state.hand(p(0)).len(), 2);
}

#[test]
fn test_play_drawn_card() {
    let deal = Deal::new(num(Color::Red, 0))
        .with_hand([num(Color::Blue, 9)])
        .with_hand([num(Color::Green, 3)])
        .with_draw_pile([num(Color::Red, 3)]);
    let mut state = GameState::from_deal(RuleConfig::new(2), deal, 0).unwrap();

    state.draw_for_turn(p(0)).unwrap();
    assert_eq!(state.phase(), &Phase::Drawing { drawn: num(Color::Red, 3) });
    assert_eq!(state.active_player(), p(0));
    assert_eq!(state.legal_moves(), vec![Move::play(num(Color::Red, 3))]);
    assert_eq!(state.draw_for_turn(p(0)).unwrap_err(), UnoError::DrawNotAllowed { player: p(0) });

    state.apply_move(p(0), Move::play(num(Color::Red, 3))).unwrap();
    assert_eq!(state.hand(p(0)), &[num(Color::Blue, 9)]);
    assert_eq!(state.active_player(), p(1));
    assert_eq!(state.phase(), &Phase::Playing);
    assert_eq!(
        events(&state),
        vec![
            (p(0), TurnEvent::Drew { count: 1, playable: true }),
            (p(0), TurnEvent::Played(Move::play(num(Color::Red, 3)))),
        ]
    );
}

#[test]
fn test_pass_after_draw() {
    let deal = Deal::new(num(Color::Red, 0))
        .with_hand([num(Color::Blue, 9)])
        .with_hand([num(Color::Green, 3)])
        .with_draw_pile([num(Color::Red, 3)]);
    let config = RuleConfig::new(2).with_draw_rule(DrawRule::PassAfterDraw);
    let mut state = GameState::from_deal(config, deal, 0).unwrap();

    state.draw_for_turn(p(0)).unwrap();

    assert_eq!(state.hand(p(0)).len(), 2);
    assert_eq!(state.active_player(), p(1));
    assert_eq!(state.phase(), &Phase::Playing);
}

#[test]
fn test_draw_until_playable() {
    let deal = Deal::new(num(Color::Red, 0))
        .with_hand([num(Color::Blue, 9)])
        .with_hand([num(Color::Green, 3)])
        .with_draw_pile([num(Color::Yellow, 4), num(Color::Red, 3), num(Color::Blue, 1), num(Color::Green, 2)]);
    let config = RuleConfig::new(2).with_draw_rule(DrawRule::DrawUntilPlayable);
    let mut state = GameState::from_deal(config, deal, 0).unwrap();

    state.draw_for_turn(p(0)).unwrap();

    assert_eq!(state.hand(p(0)).len(), 4);
    assert_eq!(state.deck().len(), 1);
    assert_eq!(state.phase(), &Phase::Drawing { drawn: num(Color::Red, 3) });
    assert_eq!(events(&state), vec![(p(0), TurnEvent::Drew { count: 3, playable: true })]);
}

#[test]
fn test_final_draw_card_still_penalizes() {
    let table = || {
        Deal::new(num(Color::Red, 0))
            .with_hand([card(Color::Red, Rank::DrawTwo)])
            .with_hand([num(Color::Blue, 1)])
            .with_draw_pile([num(Color::Yellow, 1), num(Color::Yellow, 2), num(Color::Yellow, 3)])
    };
    let finisher = Move::play(card(Color::Red, Rank::DrawTwo));

    let mut state = GameState::from_deal(RuleConfig::new(2), table(), 0).unwrap();
    state.apply_move(p(0), finisher).unwrap();
    assert_eq!(state.outcome(), Some(GameOutcome::winner(p(0))));
    assert_eq!(state.hand(p(1)).len(), 3);

    let lenient = RuleConfig::new(2).with_penalty_on_final_draw_card(false);
    let mut state = GameState::from_deal(lenient, table(), 0).unwrap();
    state.apply_move(p(0), finisher).unwrap();
    assert_eq!(state.outcome(), Some(GameOutcome::winner(p(0))));
    assert_eq!(state.hand(p(1)).len(), 1);
}

#[test]
fn test_final_penalty_voided_when_deck_is_spent() {
    let finisher = Move::play(card(Color::Red, Rank::DrawTwo));

    for exhaustion in [ExhaustionRule::EndInDraw, ExhaustionRule::Error] {
        let deal = Deal::new(num(Color::Red, 0))
            .with_hand([card(Color::Red, Rank::DrawTwo)])
            .with_hand([num(Color::Blue, 1)]);
        let config = RuleConfig::new(2).with_exhaustion(exhaustion);
        let mut state = GameState::from_deal(config, deal, 0).unwrap();

        state.apply_move(p(0), finisher).unwrap();

        assert_eq!(state.outcome(), Some(GameOutcome::winner(p(0))));
        assert_eq!(state.hand(p(1)).len(), 1);
        assert_eq!(
            events(&state),
            vec![
                (p(0), TurnEvent::Played(finisher)),
                (p(1), TurnEvent::PenaltyVoided { count: 2 }),
            ]
        );
        assert_eq!(state.all_cards().count(), 3);
    }
}

#[test]
fn test_greedy_table_plays_to_the_end() {
    let config = RuleConfig::new(6).with_hand_size_recording(true);
    let mut state = GameState::new(config, 99).unwrap();
    let mut agents: Vec<Box<dyn Agent>> = (0..6).map(|_| Box::new(GreedyAgent::new()) as Box<dyn Agent>).collect();

    while !state.is_terminal() {
        state.step(&mut agents).unwrap();
    }

    assert!(state.turns_played() <= 1000);
    assert_eq!(state.all_cards().count(), 108);
    assert_eq!(state.hand_size_trace().len(), state.turns_played() as usize + 1);
}
