//! Embedded HTML/CSS/JS frontend for the order dashboard.
//!
//! The entire page is compiled into the binary as a string constant.
//! No external assets, no build tools, no CDN dependencies. It fetches
//! the initial data from the JSON API and then follows the server's
//! snapshot feed over SSE.

/// The complete dashboard page.
pub const INDEX_HTML: &str = r##"<!DOCTYPE html>
<html lang="ru">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>Заказы на Реал-тайм</title>
<style>
:root {
  --bg: #0d1117;
  --surface: #161b22;
  --border: #30363d;
  --text: #e6edf3;
  --text-muted: #8b949e;
  --accent: #58a6ff;
  --pending: #fbbf24;
  --completed: #10b981;
  --cancelled: #ef4444;
  --radius: 8px;
  --font: -apple-system, BlinkMacSystemFont, 'Segoe UI', Helvetica, Arial, sans-serif;
}

* { margin: 0; padding: 0; box-sizing: border-box; }
body {
  background: var(--bg);
  color: var(--text);
  font-family: var(--font);
  font-size: 14px;
  line-height: 1.5;
}

.app { max-width: 960px; margin: 0 auto; padding: 24px; }

header {
  margin-bottom: 24px;
  padding-bottom: 16px;
  border-bottom: 1px solid var(--border);
}
header h1 { font-size: 24px; font-weight: 600; }
header .subtitle { color: var(--text-muted); font-size: 13px; }

.loading {
  color: var(--text-muted);
  text-align: center;
  padding: 64px 0;
}

.stats-grid {
  display: grid;
  grid-template-columns: repeat(auto-fit, minmax(180px, 1fr));
  gap: 12px;
  margin-bottom: 24px;
}
.stat-card {
  background: var(--surface);
  border: 1px solid var(--border);
  border-radius: var(--radius);
  padding: 16px;
}
.stat-value { font-size: 28px; font-weight: 700; }
.stat-label { color: var(--text-muted); font-size: 12px; text-transform: uppercase; letter-spacing: .04em; }
.stat-card.pending .stat-value { color: var(--pending); }
.stat-card.completed .stat-value { color: var(--completed); }

.orders-section h2 { font-size: 16px; margin-bottom: 12px; }
.orders-list { display: flex; flex-direction: column; gap: 8px; }
.empty-state { color: var(--text-muted); padding: 24px; text-align: center; }

.order-card {
  background: var(--surface);
  border: 1px solid var(--border);
  border-radius: var(--radius);
  padding: 12px 16px;
}
.order-header { display: flex; justify-content: space-between; align-items: center; }
.order-customer strong { margin-right: 8px; }
.order-phone { color: var(--text-muted); font-size: 12px; }
.order-status {
  color: #0d1117;
  border-radius: 50px;
  padding: 2px 10px;
  font-size: 12px;
  font-weight: 600;
}
.order-status.pending { background: var(--pending); }
.order-status.completed { background: var(--completed); }
.order-status.cancelled { background: var(--cancelled); }
.order-details { display: flex; justify-content: space-between; margin-top: 6px; }
.order-amount { font-weight: 600; }
.order-time { color: var(--text-muted); font-size: 12px; }
.order-description { color: var(--text-muted); margin-top: 4px; font-size: 13px; }

.info-box {
  margin-top: 24px;
  background: var(--surface);
  border: 1px solid var(--border);
  border-radius: var(--radius);
  padding: 16px;
  color: var(--text-muted);
  font-size: 13px;
}
.info-box h3 { color: var(--text); font-size: 14px; margin-bottom: 6px; }
.info-box code { color: var(--accent); }
</style>
</head>
<body>
<div class="app">
  <header>
    <h1>Заказы на Реал-тайм</h1>
    <p class="subtitle">Бот статистика и мониторинг</p>
  </header>

  <div id="content"><div class="loading">Yuklanmoqda...</div></div>

  <div class="info-box">
    <h3>Telegram бот интеграция</h3>
    <p>Отправьте ваш Telegram bot token в переменную окружения <code>TELEGRAM_BOT_TOKEN</code></p>
    <p>Бот автоматически будет отслеживать заказы и обновлять статистику в реальном времени</p>
  </div>
</div>

<script>
// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------
let stats = null;
let orders = [];
let loading = true;

function esc(s) {
  return String(s ?? '').replace(/&/g, '&amp;').replace(/</g, '&lt;')
    .replace(/>/g, '&gt;').replace(/"/g, '&quot;');
}

// ---------------------------------------------------------------------------
// Render
// ---------------------------------------------------------------------------
function render() {
  const root = document.getElementById('content');
  if (loading) {
    root.innerHTML = '<div class="loading">Yuklanmoqda...</div>';
    return;
  }

  const tiles = `
    <div class="stats-grid">
      <div class="stat-card"><div class="stat-value">${stats?.totalOrders || 0}</div><div class="stat-label">Всего заказов</div></div>
      <div class="stat-card"><div class="stat-value">${stats?.totalCustomers || 0}</div><div class="stat-label">Клиентов</div></div>
      <div class="stat-card pending"><div class="stat-value">${stats?.pendingOrders || 0}</div><div class="stat-label">В ожидании</div></div>
      <div class="stat-card completed"><div class="stat-value">${stats?.completedOrders || 0}</div><div class="stat-label">Выполнено</div></div>
    </div>`;

  const rows = orders.length === 0
    ? '<div class="empty-state">Заказов нет</div>'
    : orders.map(o => `
      <div class="order-card">
        <div class="order-header">
          <div class="order-customer">
            <strong>${esc(o.customers?.name || 'Unknown')}</strong>
            <span class="order-phone">${esc(o.customers?.phone || '')}</span>
          </div>
          <span class="order-status ${esc(o.status)}">${esc(o.status)}</span>
        </div>
        <div class="order-details">
          <div class="order-amount">${esc(o.amount)} сум</div>
          <div class="order-time">${new Date(o.created_at).toLocaleString('uz-UZ')}</div>
        </div>
        ${o.description ? `<div class="order-description">${esc(o.description)}</div>` : ''}
      </div>`).join('');

  root.innerHTML = tiles + `
    <div class="orders-section">
      <h2>Недавние заказы</h2>
      <div class="orders-list">${rows}</div>
    </div>`;
}

// ---------------------------------------------------------------------------
// Initial load + live feed
// ---------------------------------------------------------------------------
async function load() {
  const [statsRes, ordersRes] = await Promise.all([
    fetch('/api/stats'), fetch('/api/orders'),
  ]);
  stats = await statsRes.json();
  orders = await ordersRes.json();
  loading = false;
  render();
}

function subscribe() {
  const feed = new EventSource('/events');
  feed.onmessage = e => {
    const snapshot = JSON.parse(e.data);
    if (snapshot.phase !== 'ready') return;
    stats = snapshot.stats;
    orders = snapshot.orders;
    loading = false;
    render();
  };
}

load().catch(e => console.error('Error loading dashboard:', e));
subscribe();
</script>
</body>
</html>"##;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_has_the_four_stat_tiles_and_the_feed() {
        assert!(INDEX_HTML.contains("Всего заказов"));
        assert!(INDEX_HTML.contains("Клиентов"));
        assert!(INDEX_HTML.contains("В ожидании"));
        assert!(INDEX_HTML.contains("Выполнено"));
        assert!(INDEX_HTML.contains("EventSource('/events')"));
        assert!(INDEX_HTML.contains("Yuklanmoqda"));
    }

    #[test]
    fn status_badges_use_the_model_colors() {
        for (status, color) in [("pending", "#fbbf24"), ("completed", "#10b981"), ("cancelled", "#ef4444")] {
            assert!(INDEX_HTML.contains(&format!("--{}: {};", status, color)));
        }
    }
}
