//! Prompt templates for scenario generation.
//!
//! The product is a marketplace where stores sell surplus meals at a
//! discount for in-store pickup. The consumer app finds and buys deals;
//! the seller app lists stock and hands orders over.

use crate::models::Platform;

const CONSUMER_APP_CONTEXT: &str = "\
### Consumer app
- Users browse discounted surplus meals from nearby stores on a map or list.
- Deals have limited stock and a pickup window that closes the same day.
- Checkout takes card or wallet payments; orders are refunded if the store cancels.
- Users pick up in person by showing an order code before the window ends.
- Push notifications announce new deals from favourite stores and pickup reminders.";

const SELLER_APP_CONTEXT: &str = "\
### Seller app
- Store staff publish deals with price, quantity and a pickup window.
- Incoming orders decrement stock in real time; staff can pause or sell out a deal.
- At pickup, staff confirm the customer's order code to complete the order.
- Cancelling an order triggers a refund and notifies the customer.
- Daily settlement shows sales, fees and payouts.";

const TEST_CATEGORIES: &str = "\
## Scenario categories
- POSITIVE: the intended flow succeeds
- NEGATIVE: invalid input, refusals and error handling
- EDGE_CASE: boundaries, empty states and unusual sequences
- PAYMENT: charges, failures, refunds and partial refunds
- PICKUP: pickup window, order code verification, no-shows
- LOCATION: location permission, distance sorting, maps
- NOTIFICATION: push delivery, deep links, opt-out
- TIME_SENSITIVE: closing windows, time zones, deals expiring mid-flow
- INVENTORY: stock sync, last item contention, sell-outs
- AUTH: sign-up, login, session expiry
- NETWORK: offline, slow network, retries and reconnects";

const TEST_CONSIDERATIONS: &str = "\
## Testing considerations
- Stock can change between viewing a deal and paying for it.
- Pickup windows are short; many users act minutes before they close.
- Users switch apps, lose signal and come back mid-payment.
- First-time users have not granted location or notification permission.
- Both Android and iOS are supported; call out platform-specific behaviour.";

const PRIORITY_GUIDE: &str = "\
## Priority guide
- CRITICAL: blocks purchase or pickup, or loses money
- HIGH: core flow degraded, no workaround
- MEDIUM: secondary flow or workaround exists
- LOW: cosmetic or rare";

/// Fixed system instruction: a senior QA persona that answers in JSON only.
pub fn system_prompt() -> String {
    "You are a senior QA engineer and UX specialist with ten years of experience. \
You design test scenarios from the user's point of view.

## Principles

1. **User journeys first**: focus on what people actually do, not on implementation details.
2. **Expectations and feelings**: consider what the user expects and feels at each step.
3. **Real context**: on a crowded train, during a busy lunch break, on first launch.
4. **Personas**: new and returning users, experienced and first-time, young and old.

## How to write scenarios

Bad: \"Check that the login API returns 200\"
Good: \"A hungry office worker looks for a nearby discounted meal during a short lunch break\"

Bad: \"Clicking the pay button calls the payment module\"
Good: \"The user changes their mind right before paying and switches to another meal\"

Respond only with the JSON format you are given."
        .to_string()
}

fn platform_context(platform: Platform) -> String {
    match platform {
        Platform::ConsumerApp => CONSUMER_APP_CONTEXT.to_string(),
        Platform::SellerApp => SELLER_APP_CONTEXT.to_string(),
        Platform::Both => format!("{}\n\n{}", CONSUMER_APP_CONTEXT, SELLER_APP_CONTEXT),
    }
}

/// User instruction carrying product context, the PRD and the output contract.
pub fn user_prompt(prd_content: &str, platform: Platform) -> String {
    format!(
        r#"
## Product context
{context}

{categories}

{considerations}

{priorities}

---

## PRD
{prd}

---

## Output format

Respond only with JSON in the format below. Do not include any other text.

```json
{{
  "scenarios": [
    {{
      "title": "Scenario title (clear and specific)",
      "description": "What the scenario covers",
      "category": "POSITIVE | NEGATIVE | EDGE_CASE | PAYMENT | PICKUP | LOCATION | TIME_SENSITIVE | INVENTORY | NOTIFICATION | NETWORK | AUTH",
      "priority": "CRITICAL | HIGH | MEDIUM | LOW",
      "deviceType": "ANDROID | IOS | BOTH",
      "testCases": [
        {{
          "step": 1,
          "action": "A concrete action the user performs",
          "expected": "The result the user can observe"
        }}
      ]
    }}
  ]
}}
```

## Requirements

1. **User story titles**: phrase titles as "When ..." or "A user who ...".
2. Produce at least 3 scenarios for every feature.
3. POSITIVE, NEGATIVE and EDGE_CASE scenarios are mandatory.
4. Each scenario has 3 to 7 steps, written as user actions.
5. **action**: what the user does (e.g. "Taps the 'Nearby' tab on the home screen").
6. **expected**: what the user can see (e.g. "Discounted stores within 500 m are listed").
7. No text outside the JSON block.

## Scenario types to include

### A. User journeys (30%)
1. **Happy path**: the ideal journey
2. **First-time user**: someone opening the app for the first time
3. **In a hurry**: the flow under time pressure

### B. Edge cases and functional QA (70%)
4. **Boundaries**: min/max values, empty input, zero items, one item, large data
5. **Network failures**: slow network, timeouts, dropped connection, reconnect
6. **Permissions and state**: expired login, missing permission, concurrent sessions
7. **Data states**: empty lists, no data, loading, error screens
8. **Input validation**: invalid input, special characters, long text, injection attempts
9. **Concurrency**: double taps, rapid repeated requests, simultaneous edits
10. **Recovery**: back navigation, cancel, undo, refresh
11. **Device specifics**: rotation, backgrounding, low memory, incoming notifications

## Scenario mix

- POSITIVE: 20%
- NEGATIVE: 40%
- EDGE_CASE: 40%
"#,
        context = platform_context(platform),
        categories = TEST_CATEGORIES,
        considerations = TEST_CONSIDERATIONS,
        priorities = PRIORITY_GUIDE,
        prd = prd_content,
    )
}
