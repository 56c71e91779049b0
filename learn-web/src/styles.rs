pub const APP_STYLES: &str = r#"
:root {
    --bg: #f8fafc;
    --surface: #ffffff;
    --border-color: #e2e8f0;
    --text-primary: #0f172a;
    --text-secondary: #64748b;
    --accent: #2563eb;
    --accent-hover: #1d4ed8;
    --danger: #dc2626;
    --danger-bg: #fef2f2;
}

* { box-sizing: border-box; }

body {
    margin: 0;
    background: var(--bg);
    color: var(--text-primary);
    font-family: 'Inter', system-ui, -apple-system, sans-serif;
    font-size: 14px;
}

/* Buttons */
.btn {
    display: inline-flex;
    align-items: center;
    gap: 0.4rem;
    padding: 0.5rem 0.9rem;
    border-radius: 0.5rem;
    border: 1px solid var(--border-color);
    background: var(--surface);
    color: var(--text-primary);
    font: inherit;
    cursor: pointer;
    text-decoration: none;
}

.btn:disabled { opacity: 0.55; cursor: not-allowed; }

.btn-primary {
    background: var(--accent);
    border-color: var(--accent);
    color: #fff;
}

.btn-primary:hover:not(:disabled) { background: var(--accent-hover); }

.btn-ghost { background: transparent; border-color: transparent; }

.btn-icon {
    background: transparent;
    border: none;
    color: var(--text-secondary);
    cursor: pointer;
    padding: 0.15rem 0.35rem;
    border-radius: 0.35rem;
}

.btn-icon:hover:not(:disabled) { background: #f1f5f9; color: var(--text-primary); }

/* Auth + onboarding cards */
.auth-page, .onboarding-page {
    min-height: 100vh;
    display: flex;
    align-items: center;
    justify-content: center;
    padding: 2rem 1rem;
}

.auth-card, .onboarding-card {
    width: 100%;
    max-width: 720px;
    background: var(--surface);
    border: 1px solid var(--border-color);
    border-radius: 0.9rem;
    padding: 2rem;
    box-shadow: 0 10px 30px rgba(15, 23, 42, 0.06);
}

.auth-card { max-width: 420px; text-align: center; }
.auth-title { margin: 0 0 0.5rem 0; font-size: 1.6rem; }
.auth-subtitle { color: var(--text-secondary); margin: 0 0 1.25rem 0; }
.home-actions { display: flex; gap: 0.5rem; justify-content: center; flex-wrap: wrap; }

.onboarding-steps {
    display: flex;
    align-items: center;
    gap: 0.5rem;
    margin-bottom: 1.5rem;
}

.step-dot {
    width: 1.75rem;
    height: 1.75rem;
    border-radius: 999px;
    display: inline-flex;
    align-items: center;
    justify-content: center;
    border: 1px solid var(--border-color);
    color: var(--text-secondary);
    font-weight: 600;
}

.step-dot.active { background: var(--accent); border-color: var(--accent); color: #fff; }
.step-line { flex: 0 0 2.5rem; height: 1px; background: var(--border-color); }
.step-caption { margin-left: auto; color: var(--text-secondary); font-size: 0.8rem; }

.onboarding-form { display: flex; flex-direction: column; gap: 0.75rem; }
.onboarding-title { margin: 0; font-size: 1.3rem; }

.form-label { font-weight: 600; font-size: 0.85rem; }

.form-input {
    width: 100%;
    padding: 0.55rem 0.75rem;
    border: 1px solid var(--border-color);
    border-radius: 0.5rem;
    font: inherit;
}

.form-input:focus { outline: 2px solid color-mix(in srgb, var(--accent) 35%, transparent); }
.form-counter { align-self: flex-end; color: var(--text-secondary); font-size: 0.75rem; }
.form-note { color: var(--text-secondary); margin: 0; font-size: 0.85rem; }
.form-error { color: var(--danger); margin: 0; font-size: 0.85rem; display: flex; gap: 0.5rem; align-items: center; }
.form-actions { display: flex; justify-content: flex-end; gap: 0.5rem; margin-top: 0.5rem; }

.alert, .inline-alert {
    display: flex;
    justify-content: space-between;
    align-items: center;
    gap: 0.75rem;
    padding: 0.6rem 0.8rem;
    border-radius: 0.5rem;
    background: var(--danger-bg);
    color: var(--danger);
    border: 1px solid #fecaca;
}

/* Step 2 */
.drop-zone {
    border: 2px dashed var(--border-color);
    border-radius: 0.75rem;
    padding: 2rem 1rem;
    text-align: center;
    cursor: pointer;
    transition: border-color 0.15s ease, background 0.15s ease;
}

.drop-zone.hovering { border-color: var(--accent); background: #eff6ff; }
.drop-zone-icon { font-size: 1.75rem; }
.drop-zone-title { margin: 0.35rem 0 0.15rem 0; font-weight: 600; }

.url-form { display: flex; gap: 0.5rem; }
.url-list { list-style: none; margin: 0; padding: 0; display: flex; flex-direction: column; gap: 0.25rem; }

.url-item {
    display: flex;
    justify-content: space-between;
    align-items: center;
    padding: 0.35rem 0.5rem;
    border: 1px solid var(--border-color);
    border-radius: 0.4rem;
}

.url-text { overflow: hidden; text-overflow: ellipsis; white-space: nowrap; }

.drive-panel {
    display: flex;
    align-items: center;
    gap: 0.5rem;
    padding: 0.6rem 0.75rem;
    border: 1px solid var(--border-color);
    border-radius: 0.5rem;
}

.drive-title { font-weight: 600; margin-right: auto; }

.source-grid {
    display: grid;
    grid-template-columns: repeat(auto-fill, minmax(150px, 1fr));
    gap: 0.75rem;
}

.source-card {
    position: relative;
    display: flex;
    flex-direction: column;
    gap: 0.3rem;
    padding: 0.6rem;
    border: 1px solid var(--border-color);
    border-radius: 0.6rem;
    background: var(--surface);
}

.source-preview { width: 100%; height: 90px; object-fit: cover; border-radius: 0.4rem; }
.source-icon { height: 90px; display: flex; align-items: center; justify-content: center; font-size: 2rem; background: #f1f5f9; border-radius: 0.4rem; }
.source-name { font-weight: 600; font-size: 0.8rem; overflow: hidden; text-overflow: ellipsis; white-space: nowrap; }
.source-remove { position: absolute; top: 0.25rem; right: 0.25rem; background: rgba(255, 255, 255, 0.85); }

.progress { height: 4px; background: #e2e8f0; border-radius: 999px; overflow: hidden; }
.progress-bar { height: 100%; background: var(--accent); transition: width 0.2s ease; }

.pager { display: flex; align-items: center; gap: 0.5rem; justify-content: flex-end; }
.pager .form-note:first-child { margin-right: auto; }

/* Workspace */
.workspace-layout { display: flex; min-height: 100vh; }

.sidebar-left {
    width: 260px;
    flex-shrink: 0;
    border-right: 1px solid var(--border-color);
    background: #fbfbfa;
    padding: 0.5rem;
    display: flex;
    flex-direction: column;
    gap: 0.75rem;
    overflow-y: auto;
}

.sidebar-left.collapsed { width: 44px; padding: 0.5rem 0.25rem; }

.sidebar-trigger {
    align-self: flex-end;
    background: transparent;
    border: none;
    cursor: pointer;
    color: var(--text-secondary);
}

.sidebar-nav, .sidebar-section { display: flex; flex-direction: column; gap: 0.1rem; }

.sidebar-section-title {
    font-size: 0.72rem;
    font-weight: 600;
    color: var(--text-secondary);
    padding: 0.25rem 0.5rem;
}

.nav-item {
    display: flex;
    align-items: center;
    gap: 0.5rem;
    padding: 0.35rem 0.5rem;
    border-radius: 0.4rem;
    color: var(--text-primary);
    text-decoration: none;
    background: transparent;
    border: none;
    font: inherit;
    text-align: left;
    cursor: pointer;
    width: 100%;
}

.nav-item:hover, .nav-item.active { background: #efefed; }
.nav-subitem { padding-left: 1.6rem; }
.nav-title { flex: 1; overflow: hidden; text-overflow: ellipsis; white-space: nowrap; }
.nav-badge { font-size: 0.7rem; color: var(--text-secondary); }

.workspace-main { flex: 1; min-width: 0; display: flex; flex-direction: column; }

.workspace-header {
    position: sticky;
    top: 0;
    height: 3.5rem;
    display: flex;
    align-items: center;
    padding: 0 0.75rem;
    background: var(--bg);
    border-bottom: 1px solid var(--border-color);
}

.breadcrumb-page { font-weight: 500; }
.workspace-body { flex: 1; padding: 1rem; }

.sidebar-right {
    position: relative;
    flex-shrink: 0;
    border-left: 1px solid var(--border-color);
    background: #fbfbfa;
}

.sidebar-right.resizing { user-select: none; }

.sidebar-resizer {
    position: absolute;
    left: 0;
    top: 0;
    width: 4px;
    height: 100%;
    cursor: ew-resize;
    transform: translateX(-2px);
    z-index: 50;
}

.sidebar-resizer:hover, .sidebar-right.resizing .sidebar-resizer { background: #d1d5db; }
.sidebar-right-header { padding: 0.9rem 1rem; font-weight: 600; border-bottom: 1px solid var(--border-color); }

/* Editor */
.editor { max-width: 760px; margin: 0 auto; display: flex; flex-direction: column; gap: 0.5rem; }
.editor-toolbar { display: flex; gap: 0.25rem; }
.editor-block { position: relative; }

.editor-text {
    width: 100%;
    min-height: 3rem;
    border: none;
    resize: vertical;
    font: inherit;
    font-size: 1rem;
    line-height: 1.6;
    background: transparent;
    outline: none;
}

.editor-image { max-width: 100%; border-radius: 0.5rem; }
.editor-remove { position: absolute; top: 0; right: -2rem; }
"#;
